//! Theme preference - light/dark/system switching for the client
//!
//! The controller owns no globals: the persisted preference, the operating
//! system's color-scheme signal and the document it styles are all injected
//! through the traits below.

mod controller;
pub mod memory;
mod script;

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

use crate::Result;

pub use controller::{ThemeController, ToggleView};
pub use script::init_script;

/// Local storage key used when the site config does not name one
pub const DEFAULT_STORAGE_KEY: &str = "blog-starter-theme";

/// What the reader picked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Dark,
    Light,
}

impl ThemePreference {
    /// Cycle system -> dark -> light -> system
    pub fn next(self) -> Self {
        match self {
            ThemePreference::System => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::System,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::System => "system",
            ThemePreference::Dark => "dark",
            ThemePreference::Light => "light",
        }
    }

    /// Parse a stored value
    pub fn from_stored(value: &str) -> Option<Self> {
        match value.trim() {
            "system" => Some(ThemePreference::System),
            "dark" => Some(ThemePreference::Dark),
            "light" => Some(ThemePreference::Light),
            _ => None,
        }
    }

    /// The scheme to render with, given what the OS currently prefers
    pub fn resolve(self, system: ColorScheme) -> ColorScheme {
        match self {
            ThemePreference::System => system,
            ThemePreference::Dark => ColorScheme::Dark,
            ThemePreference::Light => ColorScheme::Light,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What actually gets rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Persistent key/value storage (browser local storage)
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Identifies one subscription to a [`ColorSchemeSignal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// A live feed of OS color-scheme changes
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub changes: watch::Receiver<ColorScheme>,
}

/// The OS / browser `prefers-color-scheme` signal
pub trait ColorSchemeSignal {
    fn current(&self) -> ColorScheme;
    fn subscribe(&mut self) -> Subscription;
    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// The document's presentation layer
pub trait Presentation {
    fn apply(&mut self, scheme: ColorScheme);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle() {
        let start = ThemePreference::default();
        assert_eq!(start, ThemePreference::System);
        assert_eq!(start.next(), ThemePreference::Dark);
        assert_eq!(start.next().next(), ThemePreference::Light);
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn test_stored_values() {
        for pref in [
            ThemePreference::System,
            ThemePreference::Dark,
            ThemePreference::Light,
        ] {
            assert_eq!(ThemePreference::from_stored(pref.as_str()), Some(pref));
            assert_eq!(
                serde_json::to_string(&pref).unwrap(),
                format!("\"{}\"", pref)
            );
        }
        assert_eq!(ThemePreference::from_stored("sepia"), None);
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            ThemePreference::System.resolve(ColorScheme::Dark),
            ColorScheme::Dark
        );
        assert_eq!(
            ThemePreference::Light.resolve(ColorScheme::Dark),
            ColorScheme::Light
        );
        assert_eq!(
            ThemePreference::Dark.resolve(ColorScheme::Light),
            ColorScheme::Dark
        );
    }
}
