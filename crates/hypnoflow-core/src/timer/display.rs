/// `m:ss` clock text, as shown under the bilateral countdown.
pub fn format_clock(total_secs: u64) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Clock text for a millisecond countdown, rounding partial seconds up.
pub fn format_countdown_ms(ms: u64) -> String {
    format_clock(ms.div_ceil(1000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(format_clock(60), "1:00");
        assert_eq!(format_clock(59), "0:59");
        assert_eq!(format_clock(5), "0:05");
        assert_eq!(format_clock(0), "0:00");
    }

    #[test]
    fn countdown_rounds_up() {
        assert_eq!(format_countdown_ms(59_001), "1:00");
        assert_eq!(format_countdown_ms(59_000), "0:59");
    }
}
