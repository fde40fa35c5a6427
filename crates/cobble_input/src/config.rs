use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::hotkeys::Hotkey;
use crate::keybinds::KeyBinds;

pub const SETTINGS_FILE: &str = "settings.toml";

const MIN_FOV: i32 = 1;
const MAX_FOV: i32 = 179;
const MIN_POLL_INTERVAL_MS: u64 = 50;
const MAX_POLL_INTERVAL_MS: u64 = 1000;
const MIN_VIEW_DISTANCE: i32 = 8;
const MAX_VIEW_DISTANCE: i32 = 4096;
const MIN_MOUSE_SENSITIVITY: f32 = 0.1;
const MAX_MOUSE_SENSITIVITY: f32 = 10.0;

/// Overrides for the per-platform input behaviour. Unset fields keep the
/// build target's default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escape_closes_on_key_up: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_q_quits: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSettings {
    #[serde(default = "default_fov")]
    pub default_fov: i32,
    #[serde(default = "default_view_distance")]
    pub view_distance: i32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f32,
    #[serde(default)]
    pub classic_mode: bool,
    #[serde(default)]
    pub classic_menu: bool,
    #[serde(default)]
    pub platform: PlatformOverrides,
    #[serde(default)]
    pub keybinds: KeyBinds,
    #[serde(default)]
    pub hotkeys: Vec<Hotkey>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            default_fov: default_fov(),
            view_distance: default_view_distance(),
            poll_interval_ms: default_poll_interval_ms(),
            mouse_sensitivity: default_mouse_sensitivity(),
            classic_mode: false,
            classic_menu: false,
            platform: PlatformOverrides::default(),
            keybinds: KeyBinds::default(),
            hotkeys: Vec::new(),
        }
    }
}

impl InputSettings {
    pub fn sanitize(mut self) -> Self {
        self.default_fov = self.default_fov.clamp(MIN_FOV, MAX_FOV);
        self.view_distance = self.view_distance.clamp(MIN_VIEW_DISTANCE, MAX_VIEW_DISTANCE);
        self.poll_interval_ms = self
            .poll_interval_ms
            .clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        self.mouse_sensitivity = self
            .mouse_sensitivity
            .clamp(MIN_MOUSE_SENSITIVITY, MAX_MOUSE_SENSITIVITY);
        self
    }

    pub fn from_toml(contents: &str) -> io::Result<Self> {
        let parsed = toml::from_str::<Self>(contents).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to deserialize settings: {e}"),
            )
        })?;
        Ok(parsed.sanitize())
    }

    pub fn to_toml(&self) -> io::Result<String> {
        let settings = self.clone().sanitize();
        toml::to_string_pretty(&settings).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to serialize settings: {e}"),
            )
        })
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_toml()?)
    }

    pub fn quirks(&self) -> PlatformQuirks {
        PlatformQuirks::detect().resolve(&self.platform)
    }
}

fn default_fov() -> i32 {
    70
}

fn default_view_distance() -> i32 {
    512
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_mouse_sensitivity() -> f32 {
    2.5
}

/// Loads settings, writing defaults back when the file is missing or unreadable.
pub fn load_or_create(path: &Path) -> InputSettings {
    match InputSettings::load(path) {
        Ok(settings) => settings,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let settings = InputSettings::default();
            if let Err(save_err) = settings.save(path) {
                warn!(
                    "Failed to create default settings at {}: {save_err}",
                    path.display()
                );
            }
            settings
        }
        Err(err) => {
            warn!("Failed to load settings from {}: {err}", path.display());
            let settings = InputSettings::default();
            if let Err(save_err) = settings.save(path) {
                warn!(
                    "Failed to overwrite settings at {}: {save_err}",
                    path.display()
                );
            }
            settings
        }
    }
}

/// Input behaviour that differs between platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformQuirks {
    /// Browsers swallow escape key-down, so screens close on key-up instead.
    pub escape_closes_on_key_up: bool,
    /// Super+Q quits alongside Alt+F4.
    pub super_q_quits: bool,
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        const TARGET_QUIRKS: PlatformQuirks = PlatformQuirks {
            escape_closes_on_key_up: true,
            super_q_quits: false,
        };
    } else if #[cfg(target_os = "macos")] {
        const TARGET_QUIRKS: PlatformQuirks = PlatformQuirks {
            escape_closes_on_key_up: false,
            super_q_quits: true,
        };
    } else {
        const TARGET_QUIRKS: PlatformQuirks = PlatformQuirks {
            escape_closes_on_key_up: false,
            super_q_quits: false,
        };
    }
}

impl Default for PlatformQuirks {
    fn default() -> Self {
        Self::detect()
    }
}

impl PlatformQuirks {
    pub fn detect() -> Self {
        TARGET_QUIRKS
    }

    pub fn resolve(self, overrides: &PlatformOverrides) -> Self {
        Self {
            escape_closes_on_key_up: overrides
                .escape_closes_on_key_up
                .unwrap_or(self.escape_closes_on_key_up),
            super_q_quits: overrides.super_q_quits.unwrap_or(self.super_q_quits),
        }
    }
}

#[cfg(test)]
mod tests {
    use winit::keyboard::KeyCode;

    use super::{load_or_create, InputSettings, PlatformOverrides, PlatformQuirks};
    use crate::hotkeys::Hotkey;
    use crate::keys::{InputKey, Modifiers};

    #[test]
    fn settings_survive_toml() {
        let mut settings = InputSettings::default();
        settings.classic_mode = true;
        settings.keybinds.zoom_scroll = InputKey::Key(KeyCode::KeyZ);
        settings.hotkeys.push(Hotkey {
            trigger: KeyCode::KeyG,
            modifiers: Modifiers::CTRL,
            text: "/gamemode".to_string(),
            stays_open: true,
        });
        settings.platform.super_q_quits = Some(true);

        let text = settings.to_toml().expect("serialize settings");
        let loaded = InputSettings::from_toml(&text).expect("deserialize settings");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let loaded = InputSettings::from_toml("classic_menu = true\n").expect("parse settings");
        assert!(loaded.classic_menu);
        assert_eq!(loaded.default_fov, 70);
        assert_eq!(loaded.poll_interval_ms, 250);
        assert_eq!(loaded.keybinds, Default::default());
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let settings = InputSettings {
            default_fov: 400,
            view_distance: 2,
            poll_interval_ms: 5,
            ..InputSettings::default()
        }
        .sanitize();

        assert_eq!(settings.default_fov, 179);
        assert_eq!(settings.view_distance, 8);
        assert_eq!(settings.poll_interval_ms, 50);
    }

    #[test]
    fn malformed_file_is_an_invalid_data_error() {
        let err = InputSettings::from_toml("default_fov = \"wide\"").expect_err("bad type");
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = std::env::temp_dir().join(format!("cobble-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("settings.toml");
        let _ = std::fs::remove_file(&path);

        let settings = load_or_create(&path);
        assert_eq!(settings, InputSettings::default());
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn overrides_replace_detected_quirks() {
        let detected = PlatformQuirks {
            escape_closes_on_key_up: false,
            super_q_quits: false,
        };
        let overrides = PlatformOverrides {
            escape_closes_on_key_up: Some(true),
            super_q_quits: None,
        };

        let resolved = detected.resolve(&overrides);
        assert!(resolved.escape_closes_on_key_up);
        assert!(!resolved.super_q_quits);
    }
}
