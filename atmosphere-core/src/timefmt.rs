use chrono::{DateTime, NaiveDateTime};

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Long en-US form of a location-local timestamp, e.g.
/// `"Monday, January 15, 2024 at 02:30 PM"`.
///
/// Input that does not parse is returned unchanged.
pub fn format_local_time(localtime: &str) -> String {
    match parse_local(localtime) {
        Some(dt) => dt.format("%A, %B %-d, %Y at %I:%M %p").to_string(),
        None => localtime.to_string(),
    }
}

fn parse_local(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

/// Round half toward positive infinity, matching JavaScript's `Math.round`
/// (`-2.5` → `-2`, `2.5` → `3`).
pub fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// Provider hourly clock (`"0"`, `"300"`, `"1500"`) as `HH:00`.
pub fn hourly_label(time: &str) -> String {
    match time.trim().parse::<u32>() {
        Ok(hmm) => format!("{:02}:00", hmm / 100),
        Err(_) => time.to_string(),
    }
}
