use crate::style::{Ink, NamedColor};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

pub const CELL_WIDTH_RANGE: RangeInclusive<u16> = 10..=40;
pub const CELL_HEIGHT_RANGE: RangeInclusive<u16> = 5..=10;

const DEFAULT_CELL_WIDTH: u16 = 28;
const DEFAULT_CELL_HEIGHT: u16 = 10;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("width must be between 10 and 40, got {0}")]
    WidthOutOfRange(u16),
    #[error("height must be between 5 and 10, got {0}")]
    HeightOutOfRange(u16),
    #[error("unknown color {0:?} (expected one of BLACK, RED, GREEN, YELLOW, BLUE, MAGENTA, CYAN, WHITE)")]
    UnknownColor(String),
    #[error("unknown sorting method {0:?} (expected ID, ASCENDING or DESCENDING)")]
    UnknownSortMethod(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortMethod {
    Id,
    Ascending,
    Descending,
}

impl SortMethod {
    pub fn label(&self) -> &'static str {
        match self {
            SortMethod::Id => "By ID",
            SortMethod::Ascending => "By closest",
            SortMethod::Descending => "By furthest",
        }
    }
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortMethod::Id => "ID",
            SortMethod::Ascending => "ASCENDING",
            SortMethod::Descending => "DESCENDING",
        })
    }
}

impl FromStr for SortMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ID" => Ok(SortMethod::Id),
            "ASCENDING" | "ASC" => Ok(SortMethod::Ascending),
            "DESCENDING" | "DESC" => Ok(SortMethod::Descending),
            _ => Err(ConfigError::UnknownSortMethod(s.trim().to_string())),
        }
    }
}

/// How day cells show their tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventDisplay {
    /// A single "Events: N" badge.
    Summary,
    /// One line per task description.
    Listing,
}

impl EventDisplay {
    pub fn toggled(self) -> Self {
        match self {
            EventDisplay::Summary => EventDisplay::Listing,
            EventDisplay::Listing => EventDisplay::Summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    #[serde(rename = "CELL_WIDTH")]
    cell_width: u16,
    #[serde(rename = "CELL_HEIGHT")]
    cell_height: u16,
    #[serde(rename = "ICS_VALUE")]
    ics_export: bool,
    #[serde(rename = "CALENDAR_BORDER_COLOR")]
    border_color: NamedColor,
    #[serde(rename = "TEXT_COLOR")]
    text_color: NamedColor,
    #[serde(rename = "EVENTS_COLOR")]
    events_color: NamedColor,
    #[serde(rename = "CALENDAR_BORDER_BOLD")]
    border_bold: bool,
    #[serde(rename = "TEXT_BOLD")]
    text_bold: bool,
    #[serde(rename = "EVENT_DISPLAY")]
    event_display: EventDisplay,
    #[serde(rename = "EVENT_SORT", alias = "SORTING_METHOD")]
    sort_method: SortMethod,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            ics_export: true,
            border_color: NamedColor::White,
            text_color: NamedColor::White,
            events_color: NamedColor::White,
            border_bold: false,
            text_bold: false,
            event_display: EventDisplay::Listing,
            sort_method: SortMethod::Id,
        }
    }
}

impl DisplayConfig {
    pub fn cell_width(&self) -> usize {
        self.cell_width as usize
    }

    pub fn cell_height(&self) -> usize {
        self.cell_height as usize
    }

    pub fn ics_export(&self) -> bool {
        self.ics_export
    }

    pub fn border_color(&self) -> NamedColor {
        self.border_color
    }

    pub fn text_color(&self) -> NamedColor {
        self.text_color
    }

    pub fn events_color(&self) -> NamedColor {
        self.events_color
    }

    pub fn border_bold(&self) -> bool {
        self.border_bold
    }

    pub fn text_bold(&self) -> bool {
        self.text_bold
    }

    pub fn event_display(&self) -> EventDisplay {
        self.event_display
    }

    pub fn sort_method(&self) -> SortMethod {
        self.sort_method
    }

    pub fn border_ink(&self) -> Ink {
        Ink::new(self.border_color, self.border_bold)
    }

    pub fn text_ink(&self) -> Ink {
        Ink::new(self.text_color, self.text_bold)
    }

    pub fn events_ink(&self) -> Ink {
        Ink::new(self.events_color, false)
    }

    pub fn set_cell_width(&mut self, width: u16) -> Result<(), ConfigError> {
        if !CELL_WIDTH_RANGE.contains(&width) {
            return Err(ConfigError::WidthOutOfRange(width));
        }
        self.cell_width = width;
        Ok(())
    }

    pub fn set_cell_height(&mut self, height: u16) -> Result<(), ConfigError> {
        if !CELL_HEIGHT_RANGE.contains(&height) {
            return Err(ConfigError::HeightOutOfRange(height));
        }
        self.cell_height = height;
        Ok(())
    }

    pub fn set_border_color(&mut self, color: &str) -> Result<(), ConfigError> {
        self.border_color = color.parse()?;
        Ok(())
    }

    pub fn set_text_color(&mut self, color: &str) -> Result<(), ConfigError> {
        self.text_color = color.parse()?;
        Ok(())
    }

    pub fn set_events_color(&mut self, color: &str) -> Result<(), ConfigError> {
        self.events_color = color.parse()?;
        Ok(())
    }

    pub fn set_sort_method(&mut self, method: &str) -> Result<SortMethod, ConfigError> {
        self.sort_method = method.parse()?;
        Ok(self.sort_method)
    }

    pub fn toggle_ics_export(&mut self) -> bool {
        self.ics_export = !self.ics_export;
        self.ics_export
    }

    pub fn toggle_border_bold(&mut self) -> bool {
        self.border_bold = !self.border_bold;
        self.border_bold
    }

    pub fn toggle_text_bold(&mut self) -> bool {
        self.text_bold = !self.text_bold;
        self.text_bold
    }

    pub fn toggle_event_display(&mut self) -> EventDisplay {
        self.event_display = self.event_display.toggled();
        self.event_display
    }

    /// Replaces out-of-range dimensions read from disk with defaults.
    fn sanitized(mut self) -> Self {
        if !CELL_WIDTH_RANGE.contains(&self.cell_width) {
            warn!(
                width = self.cell_width,
                "CELL_WIDTH out of range, using {DEFAULT_CELL_WIDTH}"
            );
            self.cell_width = DEFAULT_CELL_WIDTH;
        }
        if !CELL_HEIGHT_RANGE.contains(&self.cell_height) {
            warn!(
                height = self.cell_height,
                "CELL_HEIGHT out of range, using {DEFAULT_CELL_HEIGHT}"
            );
            self.cell_height = DEFAULT_CELL_HEIGHT;
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        ConfigStore { path: path.into() }
    }

    pub fn locate(override_path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = override_path {
            return Ok(ConfigStore::at(path));
        }
        let dirs = ProjectDirs::from("", "", "termcal").context("locating config directory")?;
        Ok(ConfigStore::at(dirs.config_dir().join("config.yml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: unreadable or unparseable files fall back to defaults.
    pub fn load(&self) -> DisplayConfig {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no config file, writing defaults");
            let config = DisplayConfig::default();
            if let Err(err) = self.save(&config) {
                warn!(error = %format!("{err:#}"), "could not write default config");
            }
            return config;
        }
        match self.read() {
            Ok(config) => {
                debug!(path = %self.path.display(), "loaded config");
                config.sanitized()
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %format!("{err:#}"),
                    "could not read config, using defaults"
                );
                DisplayConfig::default()
            }
        }
    }

    pub fn save(&self, config: &DisplayConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
        }
        let serialized = serde_yaml::to_string(config).context("serializing config")?;
        fs::write(&self.path, serialized).with_context(|| format!("writing {:?}", self.path))?;
        debug!(path = %self.path.display(), "saved config");
        Ok(())
    }

    fn read(&self) -> Result<DisplayConfig> {
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {:?}", self.path))?;
        serde_yaml::from_str(&data).context("parsing config file")
    }
}
