//! Turns a raw honeypot event into the enriched document the index client
//! writes: attack duration, geolocation, and an ingestion timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo::{GeoLookup, GeoPoint};

/// The JSON shape honeypots publish to the bus (spec §3.4).
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub honeypot_type: String,
    pub attacker_ip: String,
    pub attacker_port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
    pub time_of_entry: Option<String>,
    pub time_of_exit: Option<String>,
    #[serde(default)]
    pub commands_executed: Vec<String>,
}

/// The document actually indexed, carrying the fields 4.6.1 adds on top of
/// the raw event.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedEvent {
    pub honeypot_type: String,
    pub attacker_ip: String,
    pub attacker_port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
    pub time_of_entry: Option<String>,
    pub time_of_exit: Option<String>,
    pub commands_executed: Vec<String>,
    pub duration_of_attack: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "@timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// `floor((exit - entry).total_seconds())`; `0` if either timestamp is
/// missing or fails to parse (spec §4.6 step 2).
pub fn duration_of_attack(entry: &Option<String>, exit: &Option<String>) -> i64 {
    let (Some(entry), Some(exit)) = (entry, exit) else {
        return 0;
    };
    let (Ok(entry), Ok(exit)) = (
        DateTime::parse_from_rfc3339(entry),
        DateTime::parse_from_rfc3339(exit),
    ) else {
        return 0;
    };
    (exit - entry).num_seconds().max(0)
}

pub fn enrich(raw: RawEvent, geo: &GeoLookup) -> EnrichedEvent {
    let duration_of_attack = duration_of_attack(&raw.time_of_entry, &raw.time_of_exit);
    let hit = raw
        .attacker_ip
        .parse()
        .ok()
        .and_then(|ip| geo.lookup(ip));

    EnrichedEvent {
        honeypot_type: raw.honeypot_type,
        attacker_ip: raw.attacker_ip,
        attacker_port: raw.attacker_port,
        username: raw.username,
        password: raw.password,
        user_agent: raw.user_agent,
        time_of_entry: raw.time_of_entry,
        time_of_exit: raw.time_of_exit,
        commands_executed: raw.commands_executed,
        duration_of_attack,
        location: hit.as_ref().map(|h| h.location),
        country: hit.and_then(|h| h.country),
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_whole_second_duration_between_timestamps() {
        let entry = Some("2026-01-01T00:00:00Z".to_string());
        let exit = Some("2026-01-01T00:00:42Z".to_string());
        assert_eq!(duration_of_attack(&entry, &exit), 42);
    }

    #[test]
    fn falls_back_to_zero_when_timestamps_are_missing_or_unparsable() {
        assert_eq!(duration_of_attack(&None, &Some("2026-01-01T00:00:42Z".to_string())), 0);
        assert_eq!(
            duration_of_attack(&Some("not-a-date".to_string()), &Some("2026-01-01T00:00:42Z".to_string())),
            0
        );
    }
}
