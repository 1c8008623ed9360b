use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::format::{format_kb, format_uptime};
use crate::ui::bars::bar_spans;
use crate::ui::theme::Theme;

/// Top block: aggregate CPU bar, two-column per-core grid, right-aligned
/// uptime/load line, memory and swap bars.
pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    let label_width = app
        .core_percents
        .iter()
        .map(|(id, _)| format!("CPU{id}").len())
        .max()
        .unwrap_or(3)
        .max(3);

    // Aggregate bar across the full width.
    let avg_bar_width = width.saturating_sub(label_width + 15).max(5);
    let mut spans = vec![
        Span::raw("  "),
        Span::styled(format!("{:<label_width$}: ", "AVG"), theme.chrome_bold()),
    ];
    spans.extend(bar_spans(app.global_cpu_percent, avg_bar_width, theme));
    lines.push(Line::from(spans));

    // Per-core grid: left column holds the first half of the cores,
    // right column the remainder, rows interleaved.
    let half = app.core_percents.len().div_ceil(2);
    let bar_width = (width.saturating_sub(4 + 2 * (label_width + 11)) / 2).max(5);
    for i in 0..half {
        let (id, pct) = app.core_percents[i];
        let mut spans = vec![
            Span::raw("  "),
            Span::raw(format!("{:<label_width$}: ", format!("CPU{id}"))),
        ];
        spans.extend(bar_spans(pct, bar_width, theme));
        if let Some(&(id, pct)) = app.core_percents.get(i + half) {
            spans.push(Span::raw("  "));
            spans.push(Span::raw(format!("{:<label_width$}: ", format!("CPU{id}"))));
            spans.extend(bar_spans(pct, bar_width, theme));
        }
        lines.push(Line::from(spans));
    }

    // Uptime / load, right-justified.
    let status = format!(
        "Uptime: {}  Load: {:.2} {:.2} {:.2}",
        format_uptime(app.uptime_secs),
        app.load.one,
        app.load.five,
        app.load.fifteen
    );
    let pad = width.saturating_sub(status.len() + 1);
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(pad)),
        Span::styled(status, theme.chrome()),
    ]));

    // Memory and swap bars with value widths aligned across both rows.
    let mem = &app.memory;
    let mem_used = format_kb(mem.used_kb());
    let mem_total = format_kb(mem.total_kb);
    let swap_used = format_kb(mem.swap_used_kb());
    let swap_total = format_kb(mem.swap_total_kb);
    let vw = [&mem_used, &mem_total, &swap_used, &swap_total]
        .iter()
        .map(|s| s.len())
        .max()
        .unwrap_or(1);

    let mut spans = vec![Span::raw(format!("  Mem: {mem_used:>vw$}/{mem_total:>vw$} "))];
    spans.extend(bar_spans(mem.used_percent(), 20, theme));
    lines.push(Line::from(spans));

    let mut spans = vec![Span::raw(format!("  Swp: {swap_used:>vw$}/{swap_total:>vw$} "))];
    spans.extend(bar_spans(mem.swap_used_percent(), 20, theme));
    lines.push(Line::from(spans));

    frame.render_widget(Paragraph::new(lines), area);
}
