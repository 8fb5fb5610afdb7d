use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::audio::CueLog;
use crate::clock::Clock;
use crate::config::{parse_key, Config, Preset};
use crate::event::Event;
use crate::notify::arbiter::Admission;
use crate::notify::NotifyRequest;
use crate::render::terminal::TerminalCanvas;
use crate::render::compose::PULSE_GLOW;
use crate::render::Glow;
use crate::stage::Stage;
use crate::ui::theme::Theme;

/// Seconds a toast stays up
const TOAST_SECS: u16 = 2;

// ── Key map ───────────────────────────────────────────────────────────

/// Config key names resolved once at startup
#[derive(Debug, Clone)]
pub struct KeyMap {
    pub pulse_text: KeyCode,
    pub glow_banner: KeyCode,
    pub help: KeyCode,
    pub quit: KeyCode,
}

impl KeyMap {
    pub fn from_config(config: &Config) -> Self {
        let key = |name: &str| parse_key(name).unwrap_or(KeyCode::Null);
        Self {
            pulse_text: key(&config.keys.pulse_text),
            glow_banner: key(&config.keys.glow_banner),
            help: key(&config.keys.help),
            quit: key(&config.keys.quit),
        }
    }
}

// ── Application State ─────────────────────────────────────────────────

pub struct App {
    pub config: Config,
    pub keys: KeyMap,
    pub theme: Theme,
    pub stage: Stage,
    pub canvas: TerminalCanvas,
    pub cues: CueLog,
    clock: Box<dyn Clock>,

    pub should_quit: bool,
    pub show_help: bool,

    // Toast notification
    pub toast_message: Option<String>,
    pub toast_is_error: bool,
    pub toast_ticks: u16,
}

impl App {
    pub fn new(config: Config, clock: Box<dyn Clock>) -> Self {
        let glow = Glow {
            color: config.appearance.pulse_glow,
            ..PULSE_GLOW
        };
        let stage = Stage::new(config.pulse, config.phase, glow);
        let canvas = TerminalCanvas::new(config.appearance.background, config.icons.clone());
        Self {
            keys: KeyMap::from_config(&config),
            theme: Theme::default(),
            stage,
            canvas,
            cues: CueLog::new(),
            clock,
            should_quit: false,
            show_help: false,
            toast_message: None,
            toast_is_error: false,
            toast_ticks: 0,
            config,
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if key.code == KeyCode::Esc || key.code == self.keys.help {
                self.show_help = false;
            } else if key.code == self.keys.quit {
                self.should_quit = true;
            }
            return;
        }

        let now = self.clock.now();
        let code = key.code;
        if code == self.keys.quit {
            self.should_quit = true;
        } else if code == self.keys.help {
            self.show_help = true;
        } else if code == self.keys.pulse_text {
            let text = self.config.appearance.pulse_text.clone();
            if let Err(e) = self.stage.start_pulse_text(&text, now) {
                self.show_toast(&e.to_string(), true);
            }
        } else if code == self.keys.glow_banner {
            let text = self.config.appearance.banner_text.clone();
            match self.stage.toggle_banner(&text, self.config.appearance.banner_align) {
                Ok(on) => info!(on, "glow banner toggled"),
                Err(e) => self.show_toast(&e.to_string(), true),
            }
        } else if let Some(request) = self.config.preset_for(code).map(Preset::request) {
            self.fire_preset(request, now);
        }
    }

    fn fire_preset(&mut self, request: NotifyRequest, now: f64) {
        let text = request.text.clone();
        match self.stage.request_notify(request, now) {
            Ok(Admission::Started) => {}
            Ok(Admission::Queued) => {
                let queued = self.stage.arbiter().queue_len();
                self.show_toast(&format!("Queued \"{text}\" ({queued} waiting)"), false);
            }
            Err(e) => self.show_toast(&e.to_string(), true),
        }
    }

    /// Advance every effect to the current instant
    pub fn on_tick(&mut self) {
        let now = self.clock.now();
        self.stage.advance(now, &mut self.cues);
        self.tick_toast();
    }

    pub fn show_toast(&mut self, message: &str, is_error: bool) {
        self.toast_message = Some(message.to_string());
        self.toast_is_error = is_error;
        self.toast_ticks = self.config.appearance.fps.max(1).saturating_mul(TOAST_SECS);
    }

    pub fn tick_toast(&mut self) {
        if self.toast_ticks > 0 {
            self.toast_ticks -= 1;
            if self.toast_ticks == 0 {
                self.toast_message = None;
            }
        }
    }

    /// Handle events from the event loop
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Tick => self.on_tick(),
            Event::Resize(_w, _h) => {
                // canvas follows the frame area on the next draw
            }
        }
    }
}
