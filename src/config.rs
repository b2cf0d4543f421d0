use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use ratatui::style::Color;
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::dialog::Builder;
use crate::error::{ShapeLoadError, ShapeLoadResult};
use crate::loading_view::DEFAULT_DELAY_MS;
use crate::shape::DisplayMetrics;

// ─── Embedded Default ────────────────────────────────────────────────────
/// Baked into the binary at compile time; always available as the base layer.
const DEFAULT_CONFIG_TOML: &str = include_str!("../default_config.toml");

// ─── CLI Arguments (override layer) ─────────────────────────────────────
/// shapeload: a bouncing, shape-shifting loading indicator
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "shapeload", version, about, long_about = None)]
pub struct CliArgs {
    /// Delay before the first fall in milliseconds (overrides config file)
    #[arg(short, long)]
    pub delay: Option<u64>,

    /// Caption under the indicator (overrides config file)
    #[arg(short, long)]
    pub text: Option<String>,

    /// Log level filter (overrides config file)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Show the bare indicator instead of the dialog
    #[arg(long)]
    pub plain: bool,

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

/// Root configuration, parsed from TOML and then overridden by CLI flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub loading: LoadingConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    /// Milliseconds before the first fall
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Caption (empty = none)
    #[serde(default)]
    pub text: String,

    #[serde(default = "default_true")]
    pub cancelable: bool,

    /// Follows `cancelable` when unset
    #[serde(default)]
    pub canceled_on_touch_outside: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    #[serde(default = "default_fps")]
    pub fps: u16,

    /// Canvas units per density-independent unit
    #[serde(default)]
    pub density: Option<f32>,

    #[serde(default = "default_true")]
    pub show_dialog: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    #[serde(
        deserialize_with = "deserialize_color",
        default = "default_color_green"
    )]
    pub triangle: Color,

    #[serde(
        deserialize_with = "deserialize_color",
        default = "default_color_light_red"
    )]
    pub circle: Color,

    #[serde(
        deserialize_with = "deserialize_color",
        default = "default_color_light_blue"
    )]
    pub rect: Color,

    #[serde(
        deserialize_with = "deserialize_color",
        default = "default_color_darkgray"
    )]
    pub indicator: Color,

    #[serde(
        deserialize_with = "deserialize_color",
        default = "default_color_white"
    )]
    pub caption: Color,

    #[serde(deserialize_with = "deserialize_color", default = "default_color_cyan")]
    pub border: Color,

    #[serde(
        deserialize_with = "deserialize_color",
        default = "default_color_darkgray"
    )]
    pub status_bar: Color,
}

// ─── Defaults ───────────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        // The embedded file is covered by tests
        toml::from_str(DEFAULT_CONFIG_TOML)
            .expect("BUG: embedded default_config.toml is invalid TOML")
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            text: String::new(),
            cancelable: true,
            canceled_on_touch_outside: None,
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            density: None,
            show_dialog: true,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            triangle: Color::Green,
            circle: Color::LightRed,
            rect: Color::LightBlue,
            indicator: Color::DarkGray,
            caption: Color::White,
            border: Color::Cyan,
            status_bar: Color::DarkGray,
        }
    }
}

// ─── Color Deserializer ─────────────────────────────────────────────────

fn deserialize_color<'de, D>(deserializer: D) -> std::result::Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color: \"{s}\"")))
}

/// Parse a color string into a ratatui Color.
/// Supports: named colors, "reset", "#RRGGBB" hex.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "reset" | "default" | "transparent" => Some(Color::Reset),
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" | "dark_gray" | "dark_grey" => Some(Color::DarkGray),
        "lightred" | "light_red" => Some(Color::LightRed),
        "lightgreen" | "light_green" => Some(Color::LightGreen),
        "lightyellow" | "light_yellow" => Some(Color::LightYellow),
        "lightblue" | "light_blue" => Some(Color::LightBlue),
        "lightmagenta" | "light_magenta" => Some(Color::LightMagenta),
        "lightcyan" | "light_cyan" => Some(Color::LightCyan),
        hex if hex.starts_with('#') && hex.len() == 7 => {
            let r = u8::from_str_radix(&hex[1..3], 16).ok()?;
            let g = u8::from_str_radix(&hex[3..5], 16).ok()?;
            let b = u8::from_str_radix(&hex[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

// ─── Serde Default Helpers ──────────────────────────────────────────────

fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".into()
}
fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}
fn default_fps() -> u16 {
    60
}
fn default_color_white() -> Color {
    Color::White
}
fn default_color_darkgray() -> Color {
    Color::DarkGray
}
fn default_color_cyan() -> Color {
    Color::Cyan
}
fn default_color_green() -> Color {
    Color::Green
}
fn default_color_light_red() -> Color {
    Color::LightRed
}
fn default_color_light_blue() -> Color {
    Color::LightBlue
}

// ─── Path Resolution ────────────────────────────────────────────────────

impl Config {
    /// Standard config file path: ~/.config/shapeload/config.toml
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shapeload")
            .join("config.toml")
    }

    /// Log directory: ~/.local/share/shapeload/
    pub fn log_dir() -> PathBuf {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shapeload");
        std::fs::create_dir_all(&data_dir).ok();
        data_dir
    }

    /// Convenience: tick interval from FPS
    pub fn tick_rate_ms(&self) -> u64 {
        let fps = self.appearance.fps.max(1);
        1000 / fps as u64
    }

    /// Caption as Option (empty = None)
    pub fn loading_text(&self) -> Option<&str> {
        let text = self.loading.text.trim();
        if text.is_empty() { None } else { Some(text) }
    }

    pub fn canceled_on_touch_outside(&self) -> bool {
        self.loading
            .canceled_on_touch_outside
            .unwrap_or(self.loading.cancelable)
    }

    pub fn metrics(&self) -> DisplayMetrics {
        DisplayMetrics {
            density: self.appearance.density,
        }
    }

    /// Dialog builder carrying the `[loading]` options
    pub fn dialog_builder(&self) -> Builder {
        let mut builder = Builder::new(self.metrics())
            .delay(self.loading.delay_ms)
            .cancelable(self.loading.cancelable)
            .canceled_on_touch_outside(self.canceled_on_touch_outside());
        if let Some(text) = self.loading_text() {
            builder = builder.load_text(text);
        }
        builder
    }

    /// Reject values the renderer and animation can't work with
    pub fn validate(&self) -> ShapeLoadResult<()> {
        if self.appearance.fps == 0 {
            return Err(ShapeLoadError::Config("fps must be at least 1".into()));
        }
        if let Some(density) = self.appearance.density {
            if !density.is_finite() || density <= 0.0 {
                return Err(ShapeLoadError::Config(format!(
                    "density must be a positive number, got {density}"
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a config file without touching the filesystem
    pub fn from_toml(toml_str: &str) -> ShapeLoadResult<Self> {
        let config: Config = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

// ─── Bootloader ─────────────────────────────────────────────────────────

/// The single entry point for configuration. Called exactly once at startup.
///
/// 1. Resolve config file path (CLI override or default)
/// 2. If config file doesn't exist, create directory tree + write defaults
/// 3. Parse TOML from disk into Config
/// 4. Apply CLI overrides on top
pub fn load(cli: &CliArgs) -> Result<Config> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = load_from_path(&config_path)?;

    // ── CLI overrides ───────────────────────────────────────────────
    if let Some(delay) = cli.delay {
        config.loading.delay_ms = delay;
    }
    if let Some(ref text) = cli.text {
        config.loading.text = text.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.general.log_level = level.clone();
    }
    if cli.plain {
        config.appearance.show_dialog = false;
    }
    if let Some(fps) = cli.fps {
        config.appearance.fps = fps;
    }

    config.validate()?;
    Ok(config)
}

/// Read a config file, writing the defaults there first if it's missing
pub fn load_from_path(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(config_path, DEFAULT_CONFIG_TOML).wrap_err_with(|| {
            format!(
                "Failed to write default config to {}",
                config_path.display()
            )
        })?;
        info!("Created default config at {}", config_path.display());
    }

    let toml_str = std::fs::read_to_string(config_path)
        .wrap_err_with(|| format!("Failed to read config from {}", config_path.display()))?;

    Config::from_toml(&toml_str).wrap_err_with(|| {
        format!(
            "Failed to load config at {}.\n\
             Delete the file to regenerate defaults, or run:\n  \
             shapeload --print-default-config > {:?}",
            config_path.display(),
            config_path
        )
    })
}

/// Returns the embedded default config TOML string.
pub fn default_config_toml() -> &'static str {
    DEFAULT_CONFIG_TOML
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_defaults() {
        let config = Config::default();
        assert_eq!(config.loading.delay_ms, 80);
        assert_eq!(config.loading_text(), Some("Loading..."));
        assert!(config.loading.cancelable);
        assert!(config.canceled_on_touch_outside());
        assert_eq!(config.appearance.fps, 60);
        assert_eq!(config.appearance.density, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.loading.delay_ms, 80);
        assert_eq!(config.loading_text(), None);
        assert_eq!(config.theme.circle, Color::LightRed);
    }

    #[test]
    fn test_touch_outside_follows_cancelable() {
        let config = Config::from_toml("[loading]\ncancelable = false\n").unwrap();
        assert!(!config.canceled_on_touch_outside());

        let config = Config::from_toml(
            "[loading]\ncancelable = false\ncanceled_on_touch_outside = true\n",
        )
        .unwrap();
        assert!(config.canceled_on_touch_outside());
        let builder = config.dialog_builder();
        assert!(!builder.is_cancelable());
        assert!(builder.is_canceled_on_touch_outside());
    }

    #[test]
    fn test_dialog_builder_carries_loading_options() {
        let config =
            Config::from_toml("[loading]\ndelay_ms = 250\ntext = \"Syncing\"\n").unwrap();
        let builder = config.dialog_builder();
        assert_eq!(builder.delay_ms(), 250);
        assert_eq!(builder.text(), Some("Syncing"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_toml("[appearance]\nfps = 0\n"),
            Err(ShapeLoadError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("[appearance]\ndensity = -1.0\n"),
            Err(ShapeLoadError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("[theme]\ncircle = \"chartreuse\"\n"),
            Err(ShapeLoadError::Toml(_))
        ));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("Light_Blue"), Some(Color::LightBlue));
        assert_eq!(parse_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_color("#ff80"), None);
    }

    #[test]
    fn test_tick_rate_from_fps() {
        let mut config = Config::default();
        config.appearance.fps = 50;
        assert_eq!(config.tick_rate_ms(), 20);
        config.appearance.fps = 0;
        assert_eq!(config.tick_rate_ms(), 1000);
    }

    #[test]
    fn test_load_writes_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = load_from_path(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.loading.delay_ms, 80);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), default_config_toml());
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[loading]\ndelay_ms = 300\n").unwrap();

        let cli = CliArgs {
            config: Some(path),
            delay: Some(10),
            text: Some("Working".into()),
            plain: true,
            ..CliArgs::default()
        };
        let config = load(&cli).unwrap();
        assert_eq!(config.loading.delay_ms, 10);
        assert_eq!(config.loading_text(), Some("Working"));
        assert!(!config.appearance.show_dialog);
    }

    #[test]
    fn test_load_reports_bad_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[appearance]\nfps = \"fast\"\n").unwrap();
        assert!(load_from_path(&path).is_err());
    }
}
