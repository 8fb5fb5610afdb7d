use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::event::KeyCode;
use serde::Deserialize;
use tracing::info;

use crate::animation::phase::PhaseTiming;
use crate::animation::pulse_text::PulseTiming;
use crate::error::{FxError, FxResult};
use crate::notify::{IconId, NotifyKind, NotifyRequest, Rgb};
use crate::render::compose::{Align, PULSE_GLOW};

// ─── Embedded Default ────────────────────────────────────────────────────
/// Baked into the binary at compile time; always available as the base layer.
const DEFAULT_CONFIG_TOML: &str = include_str!("../default_config.toml");

// ─── CLI Arguments (override layer) ─────────────────────────────────────
/// glowtext: glowing HUD text and notification splashes in the terminal
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "glowtext", version, about, long_about = None)]
pub struct CliArgs {
    /// Log level filter (overrides config file)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Path to a custom config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the default config to stdout and exit
    #[arg(long)]
    pub print_default_config: bool,

    /// Target FPS for the render loop (overrides config file)
    #[arg(long)]
    pub fps: Option<u16>,
}

// ─── TOML Structs ───────────────────────────────────────────────────────

/// Root configuration: parsed from TOML, then overridden by CLI flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub pulse: PulseTiming,
    #[serde(default)]
    pub phase: PhaseTiming,
    #[serde(default)]
    pub keys: KeysConfig,
    /// Icon handle → glyph drawn in its place
    #[serde(default)]
    pub icons: HashMap<IconId, String>,
    #[serde(default)]
    pub presets: Vec<Preset>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Target FPS
    pub fps: u16,
    /// Canvas background
    pub background: Rgb,
    /// Glow around pulse text and the glow banner
    pub pulse_glow: Rgb,
    pub pulse_text: String,
    pub banner_text: String,
    /// Point of the banner text that sits on its anchor
    pub banner_align: Align,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    pub pulse_text: String,
    pub glow_banner: String,
    pub help: String,
    pub quit: String,
}

/// A notification fired by a key
#[derive(Debug, Clone, Deserialize)]
pub struct Preset {
    pub key: String,
    pub kind: NotifyKind,
    pub text: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<IconId>,
    #[serde(default = "default_preset_color")]
    pub color: Rgb,
}

impl Preset {
    pub fn request(&self) -> NotifyRequest {
        let mut request = NotifyRequest::new(self.kind, self.text.clone())
            .description(self.description.clone())
            .color(self.color);
        if let Some(icon) = &self.icon {
            request = request.icon(icon.clone());
        }
        request
    }
}

// ─── Defaults ───────────────────────────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            background: Rgb::new(0.05, 0.05, 0.08),
            pulse_glow: PULSE_GLOW.color,
            pulse_text: "Eliminate enemy players.".into(),
            banner_text: "Eliminate enemy players.".into(),
            banner_align: Align::CENTER,
        }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            pulse_text: "s".into(),
            glow_banner: "a".into(),
            help: "?".into(),
            quit: "q".into(),
        }
    }
}

fn default_preset_color() -> Rgb {
    Rgb::WHITE
}

// ─── Key names ──────────────────────────────────────────────────────────

/// Parse a key name: a single character, or one of `enter`, `esc`, `tab`,
/// `space`, `backspace`.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    let trimmed = s.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => return Some(KeyCode::Char(c)),
        (None, _) => return None,
        _ => {}
    }
    match trimmed.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "space" => Some(KeyCode::Char(' ')),
        "backspace" => Some(KeyCode::Backspace),
        _ => None,
    }
}

// ─── Path Resolution ────────────────────────────────────────────────────

impl Config {
    /// Standard config file path: ~/.config/glowtext/config.toml
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("glowtext")
            .join("config.toml")
    }

    /// The embedded defaults alone
    #[cfg(test)]
    pub fn embedded() -> FxResult<Config> {
        Self::parse(DEFAULT_CONFIG_TOML)
    }

    pub fn parse(toml_str: &str) -> FxResult<Config> {
        let config: Config =
            toml::from_str(toml_str).map_err(|e| FxError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the animations cannot run with
    pub fn validate(&self) -> FxResult<()> {
        let pulse = &self.pulse;
        let phase = &self.phase;
        for (name, value) in [
            ("pulse.letter_delay", pulse.letter_delay),
            ("pulse.decay_duration", pulse.decay_duration),
            ("phase.duration", phase.duration),
        ] {
            // written so NaN fails too
            if !(value > 0.0 && value.is_finite()) {
                return Err(FxError::Config(format!("{name} must be a positive number")));
            }
        }
        for (name, value) in [
            ("pulse.hold_time", pulse.hold_time),
            ("pulse.decay_step", pulse.decay_step),
            ("pulse.flicker_speed", pulse.flicker_speed),
            ("phase.hold_time", phase.hold_time),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(FxError::Config(format!("{name} must be zero or more")));
            }
        }
        if !pulse.pulse_speed.is_finite() {
            return Err(FxError::Config("pulse.pulse_speed must be finite".into()));
        }
        if pulse.batch_min == 0 || pulse.batch_min > pulse.batch_max {
            return Err(FxError::Config(format!(
                "pulse batch size range {}..={} is empty",
                pulse.batch_min, pulse.batch_max
            )));
        }
        for name in [
            &self.keys.pulse_text,
            &self.keys.glow_banner,
            &self.keys.help,
            &self.keys.quit,
        ]
        .into_iter()
        .chain(self.presets.iter().map(|p| &p.key))
        {
            if parse_key(name).is_none() {
                return Err(FxError::Config(format!("unknown key \"{name}\"")));
            }
        }
        Ok(())
    }

    /// Tick interval from FPS
    pub fn tick_rate_ms(&self) -> u64 {
        let fps = self.appearance.fps.max(1);
        1000 / fps as u64
    }

    /// Preset bound to `code`, if any
    pub fn preset_for(&self, code: KeyCode) -> Option<&Preset> {
        self.presets
            .iter()
            .find(|p| parse_key(&p.key) == Some(code))
    }

    /// Apply the CLI override layer
    pub fn apply_cli(&mut self, cli: &CliArgs) {
        if let Some(ref level) = cli.log_level {
            self.general.log_level = level.clone();
        }
        if let Some(fps) = cli.fps {
            self.appearance.fps = fps;
        }
    }
}

// ─── Bootloader ─────────────────────────────────────────────────────────

/// The single entry point for configuration. Called exactly once at startup.
///
/// 1. Resolve config file path (CLI override or default)
/// 2. If the file doesn't exist, create the directory tree and write defaults
/// 3. Parse TOML from disk into Config
/// 4. Apply CLI overrides on top
pub fn load(cli: &CliArgs) -> Result<Config> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&config_path, DEFAULT_CONFIG_TOML).wrap_err_with(|| {
            format!(
                "Failed to write default config to {}",
                config_path.display()
            )
        })?;
        info!("Created default config at {}", config_path.display());
    }

    let toml_str = std::fs::read_to_string(&config_path)
        .wrap_err_with(|| format!("Failed to read config from {}", config_path.display()))?;

    let mut config = Config::parse(&toml_str).wrap_err_with(|| {
        format!(
            "Failed to load config at {}.\n\
             Delete the file to regenerate defaults, or run:\n  \
             glowtext --print-default-config > {:?}",
            config_path.display(),
            config_path
        )
    })?;

    config.apply_cli(cli);
    Ok(config)
}

/// Returns the embedded default config TOML string.
pub fn default_config_toml() -> &'static str {
    DEFAULT_CONFIG_TOML
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::compose::{AlignX, AlignY};

    #[test]
    fn embedded_defaults_parse() {
        let config = Config::embedded().unwrap();
        assert_eq!(config.appearance.fps, 60);
        assert_eq!(config.pulse, PulseTiming::default());
        assert_eq!(config.phase, PhaseTiming::default());
        assert_eq!(config.appearance.pulse_text, "Eliminate enemy players.");
        assert_eq!(config.tick_rate_ms(), 16);
        assert_eq!(config.appearance.banner_align, Align::CENTER);
    }

    #[test]
    fn banner_alignment_is_configurable() {
        let config =
            Config::parse("[appearance]\nbanner_align = { x = \"right\", y = \"top\" }\n").unwrap();
        assert_eq!(config.appearance.banner_align.x, AlignX::Right);
        assert_eq!(config.appearance.banner_align.y, AlignY::Top);
        assert!(Config::parse("[appearance]\nbanner_align = { x = \"middle\", y = \"top\" }\n").is_err());
    }

    #[test]
    fn default_presets_match_the_demo() {
        let config = Config::embedded().unwrap();
        let splash = config.preset_for(KeyCode::Enter).unwrap().request();
        assert_eq!(splash.kind, NotifyKind::Splash);
        assert_eq!(splash.text, "First Blood!");
        assert_eq!(splash.icon, Some(IconId::new("splash_icon")));

        let streak = config.preset_for(KeyCode::Char('d')).unwrap().request();
        assert_eq!(streak.kind, NotifyKind::Killstreak);
        assert_eq!(streak.description, "Press 6 for UAV.");
        assert!(config.icons.contains_key(&IconId::new("uav_icon")));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = Config::parse("[appearance]\nfps = 30\n").unwrap();
        assert_eq!(config.appearance.fps, 30);
        assert_eq!(config.keys.quit, "q");
        assert_eq!(config.pulse.batch_max, 3);
        assert!(config.presets.is_empty());
    }

    #[test]
    fn unknown_preset_kind_is_plain() {
        let config = Config::parse(
            "[[presets]]\nkey = \"m\"\nkind = \"medal\"\ntext = \"Medal\"\ncolor = \"#ffffff\"\n",
        )
        .unwrap();
        assert_eq!(config.presets[0].kind, NotifyKind::Plain);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(matches!(
            Config::parse("[pulse]\nbatch_min = 4\nbatch_max = 2\n"),
            Err(FxError::Config(_))
        ));
        assert!(matches!(
            Config::parse("[keys]\nquit = \"nope\"\n"),
            Err(FxError::Config(_))
        ));
        assert!(matches!(
            Config::parse("[appearance]\nbackground = \"mauve\"\n"),
            Err(FxError::Config(_))
        ));
    }

    #[test]
    fn timings_must_be_finite_and_in_range() {
        for bad in [
            "[pulse]\nletter_delay = nan\n",
            "[pulse]\nletter_delay = 0.0\n",
            "[pulse]\ndecay_duration = -5.0\n",
            "[pulse]\ndecay_duration = inf\n",
            "[pulse]\nhold_time = -0.1\n",
            "[pulse]\ndecay_step = nan\n",
            "[pulse]\npulse_speed = -inf\n",
            "[phase]\nduration = nan\n",
            "[phase]\nhold_time = -1.0\n",
        ] {
            assert!(
                matches!(Config::parse(bad), Err(FxError::Config(_))),
                "accepted {bad:?}"
            );
        }
        let zero_hold = Config::parse("[pulse]\nhold_time = 0.0\ndecay_step = 0.0\n").unwrap();
        assert_eq!(zero_hold.pulse.hold_time, 0.0);
    }

    #[test]
    fn key_names() {
        assert_eq!(parse_key("enter"), Some(KeyCode::Enter));
        assert_eq!(parse_key("Esc"), Some(KeyCode::Esc));
        assert_eq!(parse_key("?"), Some(KeyCode::Char('?')));
        assert_eq!(parse_key("space"), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key(""), None);
        assert_eq!(parse_key("f13"), None);
    }

    #[test]
    fn cli_overrides_config() {
        let cli = CliArgs::try_parse_from(["glowtext", "--fps", "30", "-l", "debug"]).unwrap();
        let mut config = Config::embedded().unwrap();
        config.apply_cli(&cli);
        assert_eq!(config.appearance.fps, 30);
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.tick_rate_ms(), 33);
    }
}
