//! Human-readable byte counts

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with one decimal, e.g. `2048` becomes `"2.0 KB"`
///
/// Zero or unknown sizes render as an empty string. GB is the largest unit.
pub fn format_size(bytes: Option<u64>) -> String {
    let Some(bytes) = bytes.filter(|b| *b > 0) else {
        return String::new();
    };

    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.1} {}", UNITS[unit])
}
