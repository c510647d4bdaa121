//! Port policy: bindability checks and the active-connection guard.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddrV4, SocketAddrV6, TcpListener};

/// `true` iff a TCP listener can be bound to `(0.0.0.0, port)`. Per the
/// corrected semantic (spec §4.4, §9 Open Question 2): bindable ⇒ free.
/// Binding and immediately dropping is cheap and avoids a separate syscall
/// family just to ask "is this in use".
pub fn is_bindable(port: u16) -> bool {
    TcpListener::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port)).is_ok()
        && TcpListener::bind(SocketAddrV6::new(Ipv6Addr::UNSPECIFIED, port, 0, 0)).is_ok()
}

/// `true` iff privileged (< 1024) ports are usable by the current process —
/// i.e. the process is running with elevated capabilities. Rootless Podman
/// cannot publish privileged host ports without this.
pub fn can_bind_privileged() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// Whether at least one TCP session in the `ESTABLISHED` state currently has
/// `port` as its local port, per `/proc/net/tcp`/`/proc/net/tcp6`.
///
/// If the probe files can't be read (non-Linux host, permission issue,
/// missing procfs), the policy is conservative: assume in-use, matching the
/// spec's "if the probe tool is missing, assume in-use" instruction.
pub fn has_established_connection(port: u16) -> bool {
    const TCP_ESTABLISHED: &str = "01";

    let mut any_readable = false;
    for path in ["/proc/net/tcp", "/proc/net/tcp6"] {
        let Ok(contents) = std::fs::read_to_string(path) else {
            continue;
        };
        any_readable = true;
        for line in contents.lines().skip(1) {
            let mut fields = line.split_whitespace();
            let Some(local_addr) = fields.next() else { continue };
            let Some(state) = fields.next() else { continue };
            if state != TCP_ESTABLISHED {
                continue;
            }
            if let Some(local_port) = local_port_from_hex(local_addr) {
                if local_port == port {
                    return true;
                }
            }
        }
    }
    !any_readable
}

fn local_port_from_hex(field: &str) -> Option<u16> {
    let port_hex = field.rsplit(':').next()?;
    u16::from_str_radix(port_hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_port_from_hex_parses_procfs_field() {
        assert_eq!(local_port_from_hex("0100007F:1F90"), Some(0x1F90));
        assert_eq!(local_port_from_hex("garbage"), None);
    }

    #[test]
    fn an_unbound_high_port_is_bindable() {
        // Bind to 0 to get an ephemeral free port from the OS, then release it.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        assert!(is_bindable(port));
    }
}
