use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::carousel::{ImageRef, Page};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Pages in display order
    #[serde(default = "default_pages")]
    pub pages: Vec<PageConfig>,
    /// Page shown at startup
    #[serde(default)]
    pub start_index: usize,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            start_index: 0,
        }
    }
}

/// One carousel slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Tint shown through the cut region, hex ("#ff0000") or a basic color name
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
    /// Page artwork on disk
    #[serde(default)]
    pub image: Option<PathBuf>,
}

impl PageConfig {
    pub fn tinted(fill_color: impl Into<String>) -> Self {
        Self {
            fill_color: fill_color.into(),
            image: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Frame rate while a curl is animating
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Upper bound on a single frame step, so a stalled frame does not teleport the spring
    #[serde(default = "default_max_frame_delta")]
    pub max_frame_delta_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            animation_fps: default_animation_fps(),
            max_frame_delta_ms: default_max_frame_delta(),
        }
    }
}

impl AnimationConfig {
    /// Duration of one animation frame
    pub fn frame_duration(&self) -> Duration {
        crate::animation::timing::frame_duration(self.animation_fps)
    }

    /// Largest step fed to the spring per frame
    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(self.max_frame_delta_ms.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds when nothing is animating
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Show the status bar under the page
    #[serde(default = "default_true")]
    pub show_status_bar: bool,
    /// Theme configuration
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            show_status_bar: default_true(),
            theme: ThemeConfig::default(),
        }
    }
}

/// Theme selection, written either as a bare name (`theme = "light"`) or as a
/// table with color overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ThemeSetting")]
pub struct ThemeConfig {
    /// Theme name ("dark" or "light")
    pub name: String,
    pub colors: ThemeColorOverrides,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeSetting::Name(default_theme_name()).into()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ThemeSetting {
    Name(String),
    Table {
        #[serde(default = "default_theme_name")]
        name: String,
        #[serde(default)]
        colors: ThemeColorOverrides,
    },
}

impl From<ThemeSetting> for ThemeConfig {
    fn from(setting: ThemeSetting) -> Self {
        match setting {
            ThemeSetting::Name(name) => Self {
                name,
                colors: ThemeColorOverrides::default(),
            },
            ThemeSetting::Table { name, colors } => Self { name, colors },
        }
    }
}

/// Optional color overrides, hex strings ("#171717") or basic color names
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    /// Surface background behind pages
    pub background: Option<String>,
    /// Primary foreground
    pub foreground: Option<String>,
    /// Accent color (phase indicator)
    pub accent: Option<String>,
    /// Status bar background
    pub status_bg: Option<String>,
}

/// Keymap configuration using Vim-style notation
/// Format: "l", "<C-n>" (Ctrl+n), "<S-Tab>" (Shift+Tab), "<Right>", "<Esc>", "<Space>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Turn to the next page with a synthetic flick
    #[serde(default = "default_key_next_page")]
    pub next_page: String,
    /// Turn to the previous page with a synthetic flick
    #[serde(default = "default_key_prev_page")]
    pub prev_page: String,
    /// Show or hide the status bar
    #[serde(default = "default_key_toggle_status_bar")]
    pub toggle_status_bar: String,
    /// Drop any in-flight curl back to rest
    #[serde(default = "default_key_reset")]
    pub reset: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            next_page: default_key_next_page(),
            prev_page: default_key_prev_page(),
            toggle_status_bar: default_key_toggle_status_bar(),
            reset: default_key_reset(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_next_page() -> String { "l".to_string() }
fn default_key_prev_page() -> String { "h".to_string() }
fn default_key_toggle_status_bar() -> String { "s".to_string() }
fn default_key_reset() -> String { "<Esc>".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pagecurl")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_pages() -> Vec<PageConfig> {
    ["red", "green", "yellow", "orange"]
        .into_iter()
        .map(PageConfig::tinted)
        .collect()
}

fn default_fill_color() -> String {
    "#171717".to_string()
}

fn default_animation_fps() -> u32 {
    60
}

fn default_max_frame_delta() -> u64 {
    64
}

fn default_tick_rate() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

fn default_theme_name() -> String {
    "dark".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaults when the file is missing
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Render configuration as pretty TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    /// Reject configurations the carousel cannot be built from
    pub fn validate(&self) -> crate::Result<()> {
        if self.carousel.pages.is_empty() {
            return Err(crate::Error::Config(
                "carousel.pages must contain at least one page".to_string(),
            ));
        }
        if self.carousel.start_index >= self.carousel.pages.len() {
            return Err(crate::Error::Config(format!(
                "carousel.start_index {} is out of range for {} pages",
                self.carousel.start_index,
                self.carousel.pages.len()
            )));
        }
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/pagecurl/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pagecurl")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("pagecurl.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Build the immutable page list, indices follow configuration order
    pub fn pages(&self) -> Vec<Page> {
        self.carousel
            .pages
            .iter()
            .enumerate()
            .map(|(index, page)| {
                let tinted = Page::new(index, page.fill_color.clone());
                match page.image.as_deref() {
                    Some(path) => tinted.with_image(ImageRef::new(expand_tilde(path))),
                    None => tinted,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.carousel.pages.len(), 4);
        assert_eq!(config.carousel.pages[0].fill_color, "red");
        assert_eq!(config.carousel.pages[3].fill_color, "orange");
        assert_eq!(config.animation.animation_fps, 60);
        assert_eq!(config.keymap.next_page, "l");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml(
            r##"
            [carousel]
            start_index = 1
            pages = [
                { fill_color = "#ff0000", image = "art/0.jpg" },
                { fill_color = "green" },
            ]
            "##,
        )
        .unwrap();

        assert_eq!(config.carousel.start_index, 1);
        assert_eq!(config.carousel.pages.len(), 2);
        assert_eq!(
            config.carousel.pages[0].image.as_deref(),
            Some(Path::new("art/0.jpg"))
        );
        assert_eq!(config.ui.tick_rate_ms, 100);
        assert!(config.validate().is_ok());

        let pages = config.pages();
        assert_eq!(pages[1].index, 1);
        assert!(pages[1].image.is_none());
    }

    #[test]
    fn test_theme_as_string_or_table() {
        let config = AppConfig::from_toml("[ui]\ntheme = \"light\"\n").unwrap();
        assert_eq!(config.ui.theme.name, "light");

        let config = AppConfig::from_toml(
            "[ui.theme]\nname = \"dark\"\n[ui.theme.colors]\naccent = \"#00ff00\"\n",
        )
        .unwrap();
        assert_eq!(config.ui.theme.name, "dark");
        assert_eq!(config.ui.theme.colors.accent.as_deref(), Some("#00ff00"));
    }

    #[test]
    fn test_validate_rejects_bad_carousel() {
        let mut config = AppConfig::default();
        config.carousel.start_index = 4;
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));

        config.carousel.pages.clear();
        config.carousel.start_index = 0;
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_toml_round_trip_keeps_pages() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.carousel.pages, config.carousel.pages);
    }

    #[test]
    fn test_pages_carry_artwork() {
        let config = AppConfig::from_toml(
            "[[carousel.pages]]\nfill_color = \"red\"\nimage = \"/srv/art/cover.png\"\n\n[[carousel.pages]]\nfill_color = \"blue\"\n",
        )
        .unwrap();
        let pages = config.pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].image, Some(ImageRef::new("/srv/art/cover.png")));
        assert_eq!(pages[1].fill_color, "blue");
        assert!(pages[1].image.is_none());
    }

    #[test]
    fn test_frame_duration_fallback() {
        let mut animation = AnimationConfig::default();
        assert_eq!(animation.frame_duration(), Duration::from_millis(16));
        animation.animation_fps = 0;
        assert_eq!(animation.frame_duration(), Duration::from_millis(16));
    }
}
