use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::SortKey;
use crate::format::{format_cpu_time, truncate_unicode};
use crate::system::snapshot::DerivedProcess;
use crate::ui::theme::Theme;

/// Column widths plus ` | ` separators in front of the NAME column.
const FIXED_COLUMNS: usize = 7 + 12 + 6 + 6 + 7 + 5 + 6 * 3;

/// NAME absorbs whatever the fixed columns leave over, with a floor.
pub fn name_width(total_width: usize) -> usize {
    total_width.saturating_sub(FIXED_COLUMNS).max(4)
}

fn separator(width: usize, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled("=".repeat(width), theme.chrome()))
}

/// Separator, column header with a marker on the active sort column,
/// separator.
pub fn render_header(frame: &mut Frame, area: Rect, sort_key: SortKey, theme: &Theme) {
    let width = area.width as usize;
    let nw = name_width(width);
    let marker = |key: SortKey| if sort_key == key { "\u{25be}" } else { "" };
    let header = format!(
        "{:>7} | {:<12} | {:>6} | {:>6} | {:>7} | {:^5} | {:<nw$}",
        format!("PID{}", marker(SortKey::Pid)),
        "USER",
        format!("%CPU{}", marker(SortKey::Cpu)),
        format!("%MEM{}", marker(SortKey::Mem)),
        format!("TIME{}", marker(SortKey::Time)),
        "STATE",
        "NAME",
    );
    let lines = vec![
        separator(width, theme),
        Line::from(Span::styled(header, theme.chrome_bold())),
        separator(width, theme),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

/// Already sorted and paginated rows, one line each, severity-styled by
/// CPU share. The numeral is deliberately not clamped: a multi-core
/// process may print more than 100.0%.
pub fn render_rows(
    frame: &mut Frame,
    area: Rect,
    rows: &[(DerivedProcess, String)],
    theme: &Theme,
) {
    let width = area.width as usize;
    let nw = name_width(width);
    let lines: Vec<Line> = rows
        .iter()
        .map(|(row, user)| {
            let p = &row.process;
            let text = format!(
                "{:>7} | {:<12} | {:>5.1}% | {:>5.1}% | {:>7} | {:^5} | {:<nw$}",
                p.pid,
                truncate_unicode(user, 12),
                row.cpu_percent,
                row.mem_percent,
                format_cpu_time(p.ticks),
                p.state,
                truncate_unicode(&p.name, nw),
            );
            Line::from(Span::styled(text, theme.row_style(row.cpu_percent)))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

/// Footer separator plus the status line: task count, active sort key,
/// state legend, quit key.
pub fn render_footer(
    frame: &mut Frame,
    area: Rect,
    task_count: usize,
    sort_key: SortKey,
    quit_label: &str,
    theme: &Theme,
) {
    let width = area.width as usize;
    let status = format!(
        " Tasks: {task_count} | Sort: {} | R=Run S=Sleep D=Disk Z=Zombie T=Stop | {quit_label}=Quit",
        sort_key.label(),
    );
    let lines = vec![
        separator(width, theme),
        Line::from(Span::styled(status, theme.advisory())),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_column_has_a_floor() {
        assert_eq!(name_width(200), 200 - FIXED_COLUMNS);
        assert_eq!(name_width(40), 4);
        assert_eq!(name_width(0), 4);
    }
}
