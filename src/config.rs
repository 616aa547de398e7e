use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::cursor::DEFAULT_BLINK_PERIOD_FRAMES;
use crate::error::AppError;
use crate::sound::SoundKind;
use crate::wpm::DEFAULT_INTERVAL_MS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub fps: u32,
    pub wpm_interval_ms: u64,
    pub cursor_blink: bool,
    pub blink_period_frames: u32,
    /// Columns kept free left of the text and the cursor
    pub scroll_margin: u16,
    /// Columns moved per mouse-wheel notch
    pub wheel_step: u16,
    /// Hold time before a key highlight fades when the terminal cannot
    /// report releases
    pub release_after_ms: u64,
    pub sound: SoundKind,
    pub sound_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 60,
            wpm_interval_ms: DEFAULT_INTERVAL_MS,
            cursor_blink: false,
            blink_period_frames: DEFAULT_BLINK_PERIOD_FRAMES,
            scroll_margin: 2,
            wheel_step: 2,
            release_after_ms: 120,
            sound: SoundKind::Bell,
            sound_file: None,
        }
    }
}

impl Config {
    /// Time budget of one frame
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable files yield the defaults.
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "ignoring unreadable config, using defaults"
                );
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            fps: 30,
            wpm_interval_ms: 2000,
            cursor_blink: true,
            blink_period_frames: 15,
            scroll_margin: 4,
            wheel_step: 6,
            release_after_ms: 200,
            sound: SoundKind::Wav,
            sound_file: Some(PathBuf::from("click.wav")),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "cursor_blink": true, "sound": "silent" }"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert!(cfg.cursor_blink);
        assert_eq!(cfg.sound, SoundKind::Silent);
        assert_eq!(cfg.fps, 60);
        assert_eq!(cfg.wpm_interval_ms, 1000);
    }

    #[test]
    fn frame_interval_from_fps() {
        let cfg = Config::default();
        assert_eq!(cfg.frame_interval(), Duration::from_millis(16));

        let zero = Config {
            fps: 0,
            ..Config::default()
        };
        assert_eq!(zero.frame_interval(), Duration::from_millis(1000));
    }
}
