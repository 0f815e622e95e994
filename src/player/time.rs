/// Format a position in seconds as `M:SS`.
///
/// Minutes are not padded; seconds are. NaN and negative inputs render as
/// `00:00`.
pub fn format_time(seconds: f64) -> String {
    if seconds.is_nan() || seconds < 0.0 {
        return "00:00".to_string();
    }
    if seconds.is_infinite() {
        // Live streams report an infinite duration.
        return "--:--".to_string();
    }
    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}
