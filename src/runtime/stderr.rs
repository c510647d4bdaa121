//! Turns a raw `podman` stderr blob into a short, user-facing message.
//!
//! Ordered, first-match-wins substring/regex rules, mirroring the shape
//! (if not the exact pattern set) of the original's error simplifier.

use regex::Regex;

/// Simplify a command's stderr into a short message. `cmd` is the argv that
/// was run, used only to recover a container name when stderr doesn't carry
/// one itself.
pub fn simplify(cmd: &[String], stderr: &str) -> String {
    tracing::debug!(command = %shell_words::join(cmd), %stderr, "podman command failed");

    if stderr.contains("creating container storage: the container name") {
        if let Some(name) = extract(stderr, r#"the container name "([^"]+)" is already in use"#) {
            return format!("Container {name} already exists");
        }
    }

    if stderr.to_lowercase().contains("already exists") {
        for pattern in [
            r"container ([^ ]+) already exists",
            r"honeypot ([^ ]+) already exists",
            r"Error: ([^ ]+) already exists",
        ] {
            if let Some(name) = extract(stderr, pattern) {
                return format!("Container {name} already exists");
            }
        }
        if let Some(name) = cmd
            .iter()
            .position(|a| a == "--name")
            .and_then(|i| cmd.get(i + 1))
        {
            return format!("Container {name} already exists");
        }
    }

    let lower = stderr.to_lowercase();
    if lower.contains("permission denied") {
        return "Permission denied".into();
    }
    if lower.contains("no such container") {
        return "Container not found".into();
    }
    if let Some(name) = extract(stderr, r"container ([^ ]+) is already running") {
        return format!("Container {name} is already running");
    }
    if let Some(name) = extract(stderr, r"container ([^ ]+) is not running") {
        return format!("Container {name} is not running");
    }

    if let Some(idx) = stderr.find("Error:") {
        let part = stderr[idx + "Error:".len()..].trim();
        let truncated = part.char_indices().nth(30).map(|(i, _)| i);
        return match truncated {
            Some(i) => format!("Error: {}...", &part[..i]),
            None => format!("Error: {part}"),
        };
    }

    "Command failed".into()
}

fn extract(haystack: &str, pattern: &str) -> Option<String> {
    Regex::new(pattern)
        .ok()?
        .captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_name_conflict_from_storage_error() {
        let stderr = r#"Error: creating container storage: the container name "hive-ssh-2222" is already in use"#;
        assert_eq!(simplify(&[], stderr), "Container hive-ssh-2222 already exists");
    }

    #[test]
    fn falls_back_to_name_flag_when_stderr_has_no_name() {
        let cmd = vec!["podman".into(), "create".into(), "--name".into(), "hive-ftp-2121".into()];
        let stderr = "Error: already exists";
        assert_eq!(simplify(&cmd, stderr), "Container hive-ftp-2121 already exists");
    }

    #[test]
    fn recognises_permission_denied() {
        assert_eq!(simplify(&[], "Error: permission denied"), "Permission denied");
    }

    #[test]
    fn recognises_not_running() {
        assert_eq!(
            simplify(&[], "Error: container hive-ssh-2222 is not running"),
            "Container hive-ssh-2222 is not running"
        );
    }

    #[test]
    fn falls_back_to_generic_message() {
        assert_eq!(simplify(&[], "some unrelated noise"), "Command failed");
    }
}
