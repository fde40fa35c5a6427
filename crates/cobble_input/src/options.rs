use crate::config::InputSettings;

pub const CLASSIC_VIEW_DISTANCES: [i32; 4] = [8, 32, 128, 512];
pub const NORMAL_VIEW_DISTANCES: [i32; 10] = [8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Weather {
    #[default]
    Sunny,
    Rainy,
}

impl Weather {
    pub fn toggled(self) -> Self {
        match self {
            Weather::Sunny => Weather::Rainy,
            Weather::Rainy => Weather::Sunny,
        }
    }
}

/// Runtime game options the input core reads and toggles.
#[derive(Clone, Debug, PartialEq)]
pub struct GameOptions {
    pub classic_mode: bool,
    pub classic_menu: bool,
    pub show_fps: bool,
    pub hide_gui: bool,
    pub smooth_camera: bool,
    pub axis_lines: bool,
    pub auto_rotate: bool,
    pub breakable_liquids: bool,
    pub view_distance: i32,
    pub default_fov: i32,
    pub zoom_fov: i32,
    pub fov: i32,
    pub weather: Weather,
    pub screenshot_requested: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self::from_settings(&InputSettings::default())
    }
}

impl GameOptions {
    pub fn from_settings(settings: &InputSettings) -> Self {
        Self {
            classic_mode: settings.classic_mode,
            classic_menu: settings.classic_menu,
            show_fps: true,
            hide_gui: false,
            smooth_camera: false,
            axis_lines: false,
            auto_rotate: true,
            breakable_liquids: false,
            view_distance: settings.view_distance,
            default_fov: settings.default_fov,
            zoom_fov: settings.default_fov,
            fov: settings.default_fov,
            weather: Weather::Sunny,
            screenshot_requested: false,
        }
    }

    /// View distance ladder for the active menu style.
    pub fn view_distances(&self) -> &'static [i32] {
        if self.classic_menu {
            &CLASSIC_VIEW_DISTANCES
        } else {
            &NORMAL_VIEW_DISTANCES
        }
    }
}

/// Next larger ladder entry, wrapping to the smallest.
pub fn next_view_distance(ladder: &[i32], current: i32) -> i32 {
    ladder
        .iter()
        .copied()
        .find(|&dist| dist > current)
        .or_else(|| ladder.first().copied())
        .unwrap_or(current)
}

/// Next smaller ladder entry, wrapping to the largest.
pub fn prev_view_distance(ladder: &[i32], current: i32) -> i32 {
    ladder
        .iter()
        .rev()
        .copied()
        .find(|&dist| dist < current)
        .or_else(|| ladder.last().copied())
        .unwrap_or(current)
}
