pub mod actions;
mod defaults;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::load;
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Coordinate, REFERENCE_POINT};
use crate::location::{Accuracy, Platform};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Whether this host can show the map and read a location.
    pub map: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self { map: true }
    }
}

impl PlatformConfig {
    pub const fn platform(&self) -> Platform {
        Platform::from_map_support(self.map)
    }
}

/// How the location permission is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionMode {
    /// Ask the user every time.
    #[default]
    Prompt,
    Grant,
    Deny,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub permission: PermissionMode,
    pub request_on_start: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Accuracy,
    pub delay_ms: u64,
    pub timeout_secs: u64,
    /// Makes every position read fail with this reason.
    pub fail: Option<String>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            permission: PermissionMode::Prompt,
            request_on_start: true,
            latitude: REFERENCE_POINT.latitude,
            longitude: REFERENCE_POINT.longitude,
            accuracy: Accuracy::Balanced,
            delay_ms: 400,
            timeout_secs: 10,
            fail: None,
        }
    }
}

impl LocationConfig {
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Criteria the listing screen starts with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDefaults {
    pub neighborhood: String,
    pub radius: String,
    pub category: Category,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            neighborhood: String::new(),
            radius: "1km".to_string(),
            category: Category::AtHome,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub filters: FilterDefaults,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}
