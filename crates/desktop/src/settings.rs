use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rollcall_core::access::infrastructure::static_credentials::{
    StaticCredentials, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME,
};
use rollcall_core::shared::constants::DEFAULT_CAMERA_DEVICE;
use rollcall_core::shared::data_layout::DataLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    System,
    Dark,
    Light,
}

impl Appearance {
    pub const ALL: &[Appearance] = &[Appearance::System, Appearance::Dark, Appearance::Light];
}

impl std::fmt::Display for Appearance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Appearance::System => write!(f, "System"),
            Appearance::Dark => write!(f, "Dark"),
            Appearance::Light => write!(f, "Light"),
        }
    }
}

/// Desktop preferences, persisted as JSON.
///
/// Fields missing from the file take their default, so older files keep
/// loading after new settings are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub camera_device: String,
    pub appearance: Appearance,
    pub high_contrast: bool,
    pub font_scale: f32,
    pub admin_username: String,
    pub admin_password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: DataLayout::default_root(),
            camera_device: DEFAULT_CAMERA_DEVICE.to_string(),
            appearance: Appearance::System,
            high_contrast: false,
            font_scale: 1.0,
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Rollcall").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Reads settings from `path`, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring corrupt settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        if let Err(e) = self.save_to(&path) {
            log::warn!("Failed to save settings to {}: {e}", path.display());
        }
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }

    pub fn layout(&self) -> DataLayout {
        DataLayout::new(&self.data_dir)
    }

    pub fn credentials(&self) -> StaticCredentials {
        StaticCredentials::new(&self.admin_username, &self.admin_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::access::domain::credential_verifier::CredentialVerifier;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&tmp.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/settings.json");
        let settings = Settings {
            data_dir: tmp.path().join("data"),
            camera_device: "/dev/video2".into(),
            appearance: Appearance::Dark,
            high_contrast: true,
            font_scale: 1.25,
            admin_username: "registrar".into(),
            admin_password: "s3cret".into(),
        };

        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{"appearance": "light", "admin_password": "hunter2"}"#).unwrap();

        let settings = Settings::load_from(&path);

        assert_eq!(settings.appearance, Appearance::Light);
        assert_eq!(settings.admin_password, "hunter2");
        assert_eq!(settings.admin_username, DEFAULT_ADMIN_USERNAME);
        assert_eq!(settings.camera_device, DEFAULT_CAMERA_DEVICE);
    }

    #[test]
    fn test_credentials_follow_settings() {
        let settings = Settings {
            admin_username: "registrar".into(),
            admin_password: "s3cret".into(),
            ..Settings::default()
        };
        let credentials = settings.credentials();
        assert!(credentials.verify("registrar", "s3cret"));
        assert!(!credentials.verify("admin", "password123"));
    }
}
