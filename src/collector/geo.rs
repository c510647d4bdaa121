//! Geolocation enrichment via a local GeoIP City database.
//!
//! Grounded on `Logger_Subscriber.py`'s `lookup_geolocation`: open the
//! database once for the process lifetime, look up the attacker's address,
//! and treat any failure (unknown address, out-of-range coordinates) as "no
//! location" rather than a pipeline error — enrichment is best-effort.

use std::net::IpAddr;
use std::path::Path;

use maxminddb::geoip2;

use super::error::{CollectorError, CollectorResult};

pub struct GeoLookup {
    reader: maxminddb::Reader<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct GeoHit {
    pub location: GeoPoint,
    pub country: Option<String>,
}

impl GeoLookup {
    pub fn open(path: &Path) -> CollectorResult<Self> {
        let reader = maxminddb::Reader::open_readfile(path).map_err(|e| CollectorError::GeoDatabase {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
        })?;
        Ok(Self { reader })
    }

    /// Look up `ip`. `None` on any failure: unknown address, malformed
    /// record, or coordinates outside the valid `[-90,90] x [-180,180]`
    /// range — enrichment never fails the record over a bad geo lookup.
    pub fn lookup(&self, ip: IpAddr) -> Option<GeoHit> {
        let city: geoip2::City = self.reader.lookup(ip).ok()?;
        let location = city.location?;
        let lat = location.latitude?;
        let lon = location.longitude?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }

        let country = city.country.and_then(|c| {
            c.names
                .and_then(|names| names.get("en").copied())
                .map(|name| name.to_string())
        });

        Some(GeoHit {
            location: GeoPoint { lat, lon },
            country,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_coordinates() {
        let in_range = (45.0_f64, 90.0_f64);
        let out_of_range = (95.0_f64, 190.0_f64);
        assert!((-90.0..=90.0).contains(&in_range.0) && (-180.0..=180.0).contains(&in_range.1));
        assert!(!(-90.0..=90.0).contains(&out_of_range.0));
    }
}
