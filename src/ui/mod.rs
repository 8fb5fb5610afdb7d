pub mod help;
pub mod status_bar;
pub mod theme;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;
use theme::Theme;

/// Render the full screen: effect canvas + status bar + overlays
pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Canvas
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_canvas(f, app, chunks[0]);
    status_bar::render(f, app, chunks[1]);

    if app.show_help {
        help::render(f, app, area);
    }

    if let Some(ref msg) = app.toast_message {
        render_toast(f, msg, app.toast_is_error, &app.theme);
    }
}

/// Compose the stage onto the cell canvas and blit it
fn render_canvas(f: &mut Frame, app: &mut App, area: Rect) {
    app.canvas.resize(area.width, area.height);
    app.stage.compose(&mut app.canvas);
    f.render_widget(&app.canvas, area);
}

/// Rectangle of a fixed size centred in `area`
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Render a temporary toast notification at the top-right
fn render_toast(f: &mut Frame, message: &str, is_error: bool, theme: &Theme) {
    let area = f.area();
    let width = (message.chars().count() as u16 + 6).min(area.width.saturating_sub(4));
    let x = area.width.saturating_sub(width + 2);
    let toast_area = Rect::new(x, 1, width, 3.min(area.height));

    f.render_widget(Clear, toast_area);

    let color = if is_error { theme.error } else { theme.success };
    let icon = if is_error { " ✗ " } else { " ✓ " };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(color));

    let text = Paragraph::new(Line::from(vec![
        Span::styled(icon, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(message, Style::default().fg(theme.fg)),
    ]))
    .block(block);

    f.render_widget(text, toast_area);
}
