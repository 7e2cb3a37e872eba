use chrono::{DateTime, Utc};

/// Timestamp layout embedded in archive names: ISO-8601 with `-` for `:`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// Name of the archive produced at `now`, e.g. `file-fling-2024-05-01T09-30-00.zip`
pub fn archive_filename(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}.zip", prefix, now.format(TIMESTAMP_FORMAT))
}

/// Check a name against `<prefix>-YYYY-MM-DDTHH-MM-SS.zip`
pub fn is_archive_filename(prefix: &str, name: &str) -> bool {
    let Some(stamp) = name
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|rest| rest.strip_suffix(".zip"))
    else {
        return false;
    };

    // digits per position; 'T' and '-' are literal separators
    const SHAPE: &str = "dddd-dd-ddTdd-dd-dd";
    stamp.len() == SHAPE.len()
        && stamp.chars().zip(SHAPE.chars()).all(|(c, s)| match s {
            'd' => c.is_ascii_digit(),
            lit => c == lit,
        })
}
