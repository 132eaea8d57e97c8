use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PRIZES: &[&str] = &[
    "Mug",
    "Development Coupon",
    "Sticker",
    "T-shirt",
    "Notebook",
    "Backpack",
    "Premium Coffee Mug",
    "Wireless Earphones",
    "Thanks for participating!",
];

/// Window size written as `"<width>x<height>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub struct WindowSize {
    pub width: i32,
    pub height: i32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 900,
        }
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid window size '{0}', expected e.g. 1024x900")]
pub struct WindowSizeError(String);

impl FromStr for WindowSize {
    type Err = WindowSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || WindowSizeError(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(err)?;
        let width: i32 = w.trim().parse().map_err(|_| err())?;
        let height: i32 = h.trim().parse().map_err(|_| err())?;
        if width <= 0 || height <= 0 {
            return Err(err());
        }
        Ok(Self { width, height })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_prizes")]
    pub prizes: Vec<String>,
    #[serde(default = "default_title")]
    pub title: String,
    /// Emblem drawn on both card faces.
    #[serde(default)]
    pub logo: Option<PathBuf>,
    #[serde(default)]
    pub window: WindowSize,
}

fn default_prizes() -> Vec<String> {
    DEFAULT_PRIZES.iter().map(|p| p.to_string()).collect()
}

fn default_title() -> String {
    "Lucky Draw".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prizes: default_prizes(),
            title: default_title(),
            logo: None,
            window: WindowSize::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "devsmith", "lucky").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("LUCKY"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using built-in config: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                if touches_config(&event, &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

fn touches_config(event: &notify::Event, config_path: &std::path::Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_size_parsing() {
        let cases = vec![
            ("\"1024x900\"", WindowSize { width: 1024, height: 900 }),
            ("\"800X600\"", WindowSize { width: 800, height: 600 }),
            ("\" 360 x 640 \"", WindowSize { width: 360, height: 640 }),
        ];

        for (json, expected) in cases {
            let deserialized: WindowSize = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }

        for bad in ["\"1024\"", "\"0x900\"", "\"wide x tall\"", "\"-5x10\""] {
            assert!(serde_json::from_str::<WindowSize>(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_window_size_serializes_as_text() {
        let json = serde_json::to_string(&WindowSize::default()).unwrap();
        assert_eq!(json, "\"1024x900\"");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"prizes": ["A", "B"]}"#).unwrap();
        assert_eq!(config.prizes, vec!["A", "B"]);
        assert_eq!(config.title, "Lucky Draw");
        assert_eq!(config.logo, None);
        assert_eq!(config.window, WindowSize::default());

        let empty: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.prizes.len(), DEFAULT_PRIZES.len());
    }

    #[test]
    fn test_bundled_default_config_parses() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert!(config.prizes.len() >= 4);
        assert_eq!(config.window, WindowSize::default());
    }

    #[test]
    fn test_only_config_file_events_count() {
        let path = PathBuf::from("/tmp/lucky/config.toml");
        let hit = notify::Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(path.clone());
        let other = notify::Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/lucky/other.toml"));
        let access = notify::Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(path.clone());

        assert!(touches_config(&hit, &path));
        assert!(!touches_config(&other, &path));
        assert!(!touches_config(&access, &path));
    }
}
