use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Human-readable size from a kB count: `512K`, `1.5M`, `7.9G`.
pub fn format_kb(kb: u64) -> String {
    const MB: u64 = 1024;
    const GB: u64 = 1024 * 1024;

    if kb < MB {
        format!("{kb}K")
    } else if kb < GB {
        format!("{:.1}M", kb as f64 / MB as f64)
    } else {
        format!("{:.1}G", kb as f64 / GB as f64)
    }
}

/// Cumulative process CPU time from scheduler ticks, as `M:SS`.
/// USER_HZ is 100 on every supported target.
pub fn format_cpu_time(ticks: u64) -> String {
    const TICKS_PER_SEC: u64 = 100;
    let secs = ticks / TICKS_PER_SEC;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Uptime as `HH:MM:SS`, with a leading `Nd ` once the clock passes a day.
pub fn format_uptime(secs: f64) -> String {
    let secs = secs.max(0.0) as u64;
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let mins = (secs % 3_600) / 60;
    let s = secs % 60;
    if days > 0 {
        format!("{days}d {hours:02}:{mins:02}:{s:02}")
    } else {
        format!("{hours:02}:{mins:02}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_marks_overflow_with_ellipsis() {
        assert_eq!(truncate_unicode("short", 10), "short");
        assert_eq!(truncate_unicode("kworker/0:1-events", 8), "kworker\u{2026}");
    }

    #[test]
    fn kb_humanization_scales() {
        assert_eq!(format_kb(512), "512K");
        assert_eq!(format_kb(1536), "1.5M");
        assert_eq!(format_kb(3 * 1024 * 1024), "3.0G");
    }

    #[test]
    fn cpu_time_rolls_ticks_into_minutes() {
        assert_eq!(format_cpu_time(0), "0:00");
        assert_eq!(format_cpu_time(6_100), "1:01");
        assert_eq!(format_cpu_time(61 * 60 * 100), "61:00");
    }

    #[test]
    fn uptime_includes_days_only_when_nonzero() {
        assert_eq!(format_uptime(3_661.0), "01:01:01");
        assert_eq!(format_uptime(90_000.0), "1d 01:00:00");
        assert_eq!(format_uptime(-5.0), "00:00:00");
    }
}
