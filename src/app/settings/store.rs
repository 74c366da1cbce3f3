// Settings store: data types, global state, load/save, hidden-post records.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;

fn default_api_base() -> String {
    "http://localhost:5000".to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_photos_per_row() -> u32 {
    crate::ui_constants::DEFAULT_PHOTOS_PER_ROW
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Base URL of the puppygram API server
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Feed grid column count (the itemsPerRow of the grid)
    #[serde(default = "default_photos_per_row")]
    pub photos_per_row: u32,
    /// Persist downloaded photos as PNG in cache_dir (default: off)
    #[serde(default)]
    pub cache_photos: bool,
    /// Ids of posts the user chose to hide from the feed
    #[serde(default)]
    pub hidden_posts: Vec<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            cache_dir: default_cache_dir(),
            photos_per_row: default_photos_per_row(),
            cache_photos: false,
            hidden_posts: Vec::new(),
        }
    }
}

lazy_static! {
    pub static ref APP_SETTINGS: RwLock<AppSettings> = RwLock::new(AppSettings::default());
}

fn settings_file_path() -> PathBuf {
    // Stored next to the executable's working directory to avoid extra deps
    PathBuf::from("app_settings.json")
}

impl AppSettings {
    pub fn load_from_file(path: &std::path::Path) -> std::io::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let s: AppSettings = serde_json::from_str(&data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(s)
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, data)
    }
}

pub fn load_settings_from_disk() {
    let path = settings_file_path();
    match AppSettings::load_from_file(&path) {
        Ok(s) => {
            *APP_SETTINGS.write().unwrap() = s;
            log::info!("Loaded settings from {}", path.to_string_lossy());
        }
        Err(e) => {
            // Keep defaults if missing/unreadable
            log::info!(
                "Using default settings; cannot load {}: {}",
                path.to_string_lossy(),
                e
            );
        }
    }
}

pub fn save_settings_to_disk() {
    let path = settings_file_path();
    let st = APP_SETTINGS.read().unwrap().clone();
    if let Err(e) = st.save_to_file(&path) {
        log::error!(
            "Failed to save settings to {}: {}",
            path.to_string_lossy(),
            e
        );
    } else {
        log::info!("Saved settings to {}", path.to_string_lossy());
    }
}

/// Read access under the lock without cloning the whole struct.
pub fn with_settings<T>(f: impl FnOnce(&AppSettings) -> T) -> T {
    let st = APP_SETTINGS.read().unwrap();
    f(&st)
}

pub fn api_base() -> String {
    APP_SETTINGS.read().unwrap().api_base.clone()
}

pub fn set_photos_per_row(n: u32) {
    {
        let mut st = APP_SETTINGS.write().unwrap();
        if st.photos_per_row == n {
            return;
        }
        st.photos_per_row = n;
    }
    save_settings_to_disk();
}

// Mark a post as hidden (adds its id to settings and saves to disk)
pub fn hide_post(post_id: &str) {
    {
        let mut st = APP_SETTINGS.write().unwrap();
        if !st.hidden_posts.iter().any(|id| id == post_id) {
            st.hidden_posts.push(post_id.to_string());
        }
    }
    save_settings_to_disk();
}

pub fn unhide_all_posts() {
    let removed = {
        let mut st = APP_SETTINGS.write().unwrap();
        let n = st.hidden_posts.len();
        st.hidden_posts.clear();
        n
    };
    if removed > 0 {
        log::info!("Unhid {} posts", removed);
        save_settings_to_disk();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let s: AppSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(s.api_base, "http://localhost:5000");
        assert_eq!(s.cache_dir, PathBuf::from("cache"));
        assert_eq!(s.photos_per_row, crate::ui_constants::DEFAULT_PHOTOS_PER_ROW);
        assert!(!s.cache_photos);
        assert!(s.hidden_posts.is_empty());
    }

    #[test]
    fn settings_round_trip() {
        let s = AppSettings {
            api_base: "https://pups.example.com".into(),
            cache_dir: PathBuf::from("/tmp/pupcache"),
            photos_per_row: 5,
            cache_photos: true,
            hidden_posts: vec!["a".into(), "b".into()],
        };
        let json = serde_json::to_string(&s).unwrap();
        let back: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.api_base, s.api_base);
        assert_eq!(back.cache_dir, s.cache_dir);
        assert_eq!(back.photos_per_row, 5);
        assert!(back.cache_photos);
        assert_eq!(back.hidden_posts, s.hidden_posts);
    }
}
