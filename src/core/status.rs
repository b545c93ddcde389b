use crate::domain::model::ServiceStatus;
use chrono::Utc;
use std::collections::BTreeMap;

/// Parses the top-level block of `launchctl print <specifier>` output.
///
/// Only flat `key = value` lines directly inside the service block are kept;
/// nested blocks (arguments, environment, endpoints, ...) are skipped.
pub fn parse_print_output(specifier: &str, output: &str) -> ServiceStatus {
    let mut properties = BTreeMap::new();
    let mut depth = 0usize;

    for raw in output.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line == "}" {
            depth = depth.saturating_sub(1);
            continue;
        }

        if line.ends_with('{') {
            depth += 1;
            continue;
        }

        if depth != 1 {
            continue;
        }

        if let Some((key, value)) = line.split_once(" = ") {
            properties
                .entry(key.trim().to_string())
                .or_insert_with(|| value.trim().to_string());
        }
    }

    let state = properties.get("state").cloned();
    let pid = properties.get("pid").and_then(|p| p.parse::<u32>().ok());
    let last_exit_code = properties.get("last exit code").cloned();

    ServiceStatus {
        specifier: specifier.to_string(),
        state,
        pid,
        last_exit_code,
        properties,
        queried_at: Utc::now(),
    }
}
