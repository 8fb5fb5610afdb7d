use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;

/// Keybinding entries: (key, description)
fn keybindings(app: &App) -> Vec<(String, String)> {
    let keys = &app.config.keys;
    let mut entries = Vec::new();
    for preset in &app.config.presets {
        entries.push((preset.key.clone(), format!("{}: {}", preset.kind, preset.text)));
    }
    entries.push((keys.pulse_text.clone(), "Start pulse text".into()));
    entries.push((keys.glow_banner.clone(), "Toggle glow banner".into()));
    entries.push((keys.help.clone(), "Toggle this help".into()));
    entries.push((keys.quit.clone(), "Quit".into()));
    entries
}

/// Render the help overlay
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let entries = keybindings(app);
    let width = 52_u16.min(area.width.saturating_sub(4));
    let recent: Vec<String> = app.cues.recent().map(|cue| cue.to_string()).collect();
    let cue_lines = if recent.is_empty() { 0 } else { 3 };
    let height = (entries.len() as u16 + 6 + cue_lines).min(area.height.saturating_sub(2));

    let dialog = super::centered_rect_fixed(width, height, area);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(Line::from(vec![Span::styled(
            " Keybindings ",
            t.style_accent_bold(),
        )]))
        .borders(Borders::ALL)
        .border_type(t.border_type)
        .border_style(t.style_accent())
        .style(t.style_default());

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));

    for (key, desc) in entries {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", key), t.style_key_hint()),
            Span::styled(desc, t.style_default()),
        ]));
    }

    if !recent.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("  Recent cues", t.style_accent_bold())));
        lines.push(Line::from(Span::styled(
            format!("  {}", recent.join(" · ")),
            t.style_dim(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", t.style_dim()),
        Span::styled(app.config.keys.help.clone(), t.style_key_hint()),
        Span::styled(" or ", t.style_dim()),
        Span::styled("Esc", t.style_key_hint()),
        Span::styled(" to close", t.style_dim()),
    ]));

    let para = Paragraph::new(lines).block(block);
    frame.render_widget(para, dialog);
}
