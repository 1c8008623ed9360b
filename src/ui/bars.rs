use ratatui::text::Span;

use crate::ui::theme::Theme;

/// Filled cell count for a bar of `width` cells at `percent`. The fill is
/// capped at full even when the caller's numeral exceeds 100.
pub fn fill_width(percent: f64, width: usize) -> usize {
    let clamped = percent.clamp(0.0, 100.0);
    ((width as f64 * clamped / 100.0).floor() as usize).min(width)
}

/// A usage bar: `[||||      ] 42.0%`, fill styled by severity.
pub fn bar_spans(percent: f64, width: usize, theme: &Theme) -> Vec<Span<'static>> {
    let clamped = percent.clamp(0.0, 100.0);
    let fill = fill_width(percent, width);
    vec![
        Span::raw("["),
        Span::styled("|".repeat(fill), theme.bar_style(clamped)),
        Span::raw(" ".repeat(width - fill)),
        Span::raw(format!("] {clamped:>5.1}%")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(percent: f64, width: usize) -> String {
        bar_spans(percent, width, &Theme::default())
            .iter()
            .map(|s| s.content.as_ref())
            .collect()
    }

    #[test]
    fn zero_percent_has_empty_fill() {
        assert_eq!(rendered(0.0, 10), "[          ]   0.0%");
    }

    #[test]
    fn full_percent_fills_the_bar() {
        assert_eq!(rendered(100.0, 10), "[||||||||||] 100.0%");
    }

    #[test]
    fn overdriven_percent_is_visually_capped() {
        // A multi-core process numeral may exceed 100; the glyph may not.
        assert_eq!(fill_width(250.0, 10), 10);
        assert_eq!(rendered(250.0, 10), "[||||||||||] 100.0%");
    }

    #[test]
    fn fill_is_floored() {
        assert_eq!(fill_width(49.9, 10), 4);
        assert_eq!(fill_width(50.0, 10), 5);
        assert_eq!(fill_width(-20.0, 10), 0);
    }
}
