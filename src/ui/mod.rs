pub mod bars;
pub mod summary;
pub mod table;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::system::snapshot::DerivedProcess;
use crate::ui::theme::Theme;

const MIN_ROWS: u16 = 10;
const MIN_COLS: u16 = 40;

pub fn draw(frame: &mut Frame, app: &mut App) {
    #[cfg(feature = "perf-tracing")]
    let _span = tracing::debug_span!("ui.draw").entered();

    let theme = Theme::default();
    let area = frame.area();

    if area.height < MIN_ROWS || area.width < MIN_COLS {
        app.set_row_budget(0);
        let advisory = Paragraph::new(Span::styled("Terminal too small!", theme.advisory()));
        frame.render_widget(advisory, area);
        return;
    }

    // avg bar + core grid + uptime line + mem/swap bars
    let grid_rows = app.core_percents.len().div_ceil(2) as u16;
    let summary_height = 1 + grid_rows + 1 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(summary_height),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    // The row budget feeds back into paging; resize changes it here
    // without touching the view state.
    app.set_row_budget(chunks[2].height as usize);

    summary::render(frame, chunks[0], app, &theme);
    table::render_header(frame, chunks[1], app.sort_key, &theme);

    let visible: Vec<DerivedProcess> = app.visible_processes().to_vec();
    let rows: Vec<(DerivedProcess, String)> = visible
        .into_iter()
        .map(|row| {
            let user = app.users.resolve(row.process.uid).to_string();
            (row, user)
        })
        .collect();
    table::render_rows(frame, chunks[2], &rows, &theme);

    table::render_footer(
        frame,
        chunks[3],
        app.processes.len(),
        app.sort_key,
        &app.keybinds.quit_label(),
        &theme,
    );
}
