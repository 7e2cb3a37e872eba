use colored::*;
use std::path::Path;
use std::time::Duration;

const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Common mail attachment ceiling; larger archives are flagged
const ATTACHMENT_LIMIT: u64 = 25 * 1024 * 1024;
const HUGE: u64 = 1024 * 1024 * 1024;

/// Binary-unit size: bytes as is, one decimal for KB, two above that
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    match unit {
        0 => format!("{:.1} {}", value, UNITS[0]),
        _ => format!("{:.2} {}", value, UNITS[unit]),
    }
}

/// Size coloured by how awkward it is to send around
pub fn format_size_colored(bytes: u64) -> ColoredString {
    let s = format_size(bytes);
    match bytes {
        b if b >= HUGE => s.red().bold(),
        b if b > ATTACHMENT_LIMIT => s.yellow(),
        _ => s.green(),
    }
}

pub fn format_count(count: usize) -> String {
    match count {
        1 => "1 file".to_string(),
        n => format!("{} files", n),
    }
}

/// Display a path with the home directory shortened to `~`
pub fn format_path(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| path.strip_prefix(home).ok().map(|rest| format!("~/{}", rest.display())))
        .unwrap_or_else(|| path.display().to_string())
}

/// Build times: milliseconds under a second, then seconds, then minutes
pub fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", elapsed.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let whole = elapsed.as_secs();
        format!("{}m {}s", whole / 60, whole % 60)
    }
}

/// Describe how much smaller the archive is than its inputs
pub fn format_savings(original: u64, archived: u64) -> String {
    if original == 0 {
        return "0%".to_string();
    }
    let saved = 1.0 - archived as f64 / original as f64;
    format!("{:.0}%", saved * 100.0)
}

/// Truncate a string to max length (in characters) with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
