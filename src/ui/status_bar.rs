use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;

/// Render the bottom status bar: effect state on the left, key hints on the right
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let mode = app.stage.mode();
    let sep = || Span::styled("│ ", Style::default().fg(t.border));
    let mut spans = vec![Span::styled(
        format!(" ● {mode} "),
        Style::default()
            .fg(t.mode_color(mode))
            .add_modifier(Modifier::BOLD),
    )];

    let arbiter = app.stage.arbiter();
    if let (Some(shown), Some(phase)) = (arbiter.current(), arbiter.phase()) {
        spans.push(Span::styled(format!("\"{}\" ", shown.text), t.style_default()));
        spans.push(Span::styled(format!("{phase} "), t.style_dim()));
    }
    if let Some(next) = arbiter.queued().next() {
        spans.push(sep());
        spans.push(Span::styled(
            format!("{} queued, next \"{}\" ", arbiter.queue_len(), next.text),
            t.style_default(),
        ));
    }
    if let Some(session) = app.stage.pulse() {
        let revealed = session.last_played().map_or(0, |index| index + 1);
        let stage = if session.played_decay_sound() {
            "decaying"
        } else {
            "revealing"
        };
        spans.push(sep());
        spans.push(Span::styled(
            format!("{stage} {revealed}/{} ", session.text().len()),
            t.style_default(),
        ));
    }
    if let Some(text) = app.stage.banner() {
        spans.push(sep());
        spans.push(Span::styled(format!("\"{text}\" "), t.style_default()));
    }
    if let Some(cue) = app.cues.last() {
        let sound = cue.sound().unwrap_or("-");
        spans.push(sep());
        spans.push(Span::styled(format!("♪ {cue} ({sound}) "), t.style_dim()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    let keys = &app.config.keys;
    let hints = Line::from(vec![
        key(keys.pulse_text.clone(), app),
        desc("Pulse ", app),
        key(keys.glow_banner.clone(), app),
        desc("Glow ", app),
        key(keys.help.clone(), app),
        desc("Help ", app),
        key(keys.quit.clone(), app),
        desc("Quit", app),
    ]);
    frame.render_widget(Paragraph::new(hints).alignment(Alignment::Right), chunks[1]);
}

fn key(k: String, app: &App) -> Span<'static> {
    Span::styled(format!(" [{k}] "), app.theme.style_key_hint())
}

fn desc(d: &'static str, app: &App) -> Span<'static> {
    Span::styled(d, app.theme.style_key_desc())
}
