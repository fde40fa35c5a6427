use serde::{Deserialize, Serialize};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::keys::{InputKey, PressedKeys};

/// Logical actions a key can be bound to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyBind {
    Forward,
    Back,
    Left,
    Right,
    Jump,
    DeleteBlock,
    PlaceBlock,
    PickBlock,
    Screenshot,
    HideFps,
    Fullscreen,
    ViewDistance,
    HideGui,
    SmoothCamera,
    AxisLines,
    AutoRotate,
    ThirdPerson,
    DropBlock,
    IdOverlay,
    BreakLiquids,
    ZoomScroll,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinds {
    #[serde(default = "default_forward")]
    pub forward: InputKey,
    #[serde(default = "default_back")]
    pub back: InputKey,
    #[serde(default = "default_left")]
    pub left: InputKey,
    #[serde(default = "default_right")]
    pub right: InputKey,
    #[serde(default = "default_jump")]
    pub jump: InputKey,
    #[serde(default = "default_delete_block")]
    pub delete_block: InputKey,
    #[serde(default = "default_place_block")]
    pub place_block: InputKey,
    #[serde(default = "default_pick_block")]
    pub pick_block: InputKey,
    #[serde(default = "default_screenshot")]
    pub screenshot: InputKey,
    #[serde(default = "default_hide_fps")]
    pub hide_fps: InputKey,
    #[serde(default = "default_fullscreen")]
    pub fullscreen: InputKey,
    #[serde(default = "default_view_distance")]
    pub view_distance: InputKey,
    #[serde(default = "default_hide_gui")]
    pub hide_gui: InputKey,
    #[serde(default = "default_smooth_camera")]
    pub smooth_camera: InputKey,
    #[serde(default = "default_axis_lines")]
    pub axis_lines: InputKey,
    #[serde(default = "default_auto_rotate")]
    pub auto_rotate: InputKey,
    #[serde(default = "default_third_person")]
    pub third_person: InputKey,
    #[serde(default = "default_drop_block")]
    pub drop_block: InputKey,
    #[serde(default = "default_id_overlay")]
    pub id_overlay: InputKey,
    #[serde(default = "default_break_liquids")]
    pub break_liquids: InputKey,
    #[serde(default = "default_zoom_scroll")]
    pub zoom_scroll: InputKey,
}

impl Default for KeyBinds {
    fn default() -> Self {
        Self {
            forward: default_forward(),
            back: default_back(),
            left: default_left(),
            right: default_right(),
            jump: default_jump(),
            delete_block: default_delete_block(),
            place_block: default_place_block(),
            pick_block: default_pick_block(),
            screenshot: default_screenshot(),
            hide_fps: default_hide_fps(),
            fullscreen: default_fullscreen(),
            view_distance: default_view_distance(),
            hide_gui: default_hide_gui(),
            smooth_camera: default_smooth_camera(),
            axis_lines: default_axis_lines(),
            auto_rotate: default_auto_rotate(),
            third_person: default_third_person(),
            drop_block: default_drop_block(),
            id_overlay: default_id_overlay(),
            break_liquids: default_break_liquids(),
            zoom_scroll: default_zoom_scroll(),
        }
    }
}

impl KeyBinds {
    pub fn get(&self, bind: KeyBind) -> InputKey {
        match bind {
            KeyBind::Forward => self.forward,
            KeyBind::Back => self.back,
            KeyBind::Left => self.left,
            KeyBind::Right => self.right,
            KeyBind::Jump => self.jump,
            KeyBind::DeleteBlock => self.delete_block,
            KeyBind::PlaceBlock => self.place_block,
            KeyBind::PickBlock => self.pick_block,
            KeyBind::Screenshot => self.screenshot,
            KeyBind::HideFps => self.hide_fps,
            KeyBind::Fullscreen => self.fullscreen,
            KeyBind::ViewDistance => self.view_distance,
            KeyBind::HideGui => self.hide_gui,
            KeyBind::SmoothCamera => self.smooth_camera,
            KeyBind::AxisLines => self.axis_lines,
            KeyBind::AutoRotate => self.auto_rotate,
            KeyBind::ThirdPerson => self.third_person,
            KeyBind::DropBlock => self.drop_block,
            KeyBind::IdOverlay => self.id_overlay,
            KeyBind::BreakLiquids => self.break_liquids,
            KeyBind::ZoomScroll => self.zoom_scroll,
        }
    }

    pub fn matches(&self, bind: KeyBind, key: InputKey) -> bool {
        self.get(bind) == key
    }

    /// First bind in `candidates` that `key` is bound to.
    pub fn find(&self, candidates: &[KeyBind], key: InputKey) -> Option<KeyBind> {
        candidates.iter().copied().find(|&bind| self.matches(bind, key))
    }

    pub fn is_pressed(&self, bind: KeyBind, keys: &PressedKeys) -> bool {
        keys.is_pressed(self.get(bind))
    }
}

fn default_forward() -> InputKey {
    InputKey::Key(KeyCode::KeyW)
}

fn default_back() -> InputKey {
    InputKey::Key(KeyCode::KeyS)
}

fn default_left() -> InputKey {
    InputKey::Key(KeyCode::KeyA)
}

fn default_right() -> InputKey {
    InputKey::Key(KeyCode::KeyD)
}

fn default_jump() -> InputKey {
    InputKey::Key(KeyCode::Space)
}

fn default_delete_block() -> InputKey {
    InputKey::Mouse(MouseButton::Left)
}

fn default_place_block() -> InputKey {
    InputKey::Mouse(MouseButton::Right)
}

fn default_pick_block() -> InputKey {
    InputKey::Mouse(MouseButton::Middle)
}

fn default_screenshot() -> InputKey {
    InputKey::Key(KeyCode::F12)
}

fn default_hide_fps() -> InputKey {
    InputKey::Key(KeyCode::F3)
}

fn default_fullscreen() -> InputKey {
    InputKey::Key(KeyCode::F11)
}

fn default_view_distance() -> InputKey {
    InputKey::Key(KeyCode::KeyF)
}

fn default_hide_gui() -> InputKey {
    InputKey::Key(KeyCode::F1)
}

fn default_smooth_camera() -> InputKey {
    InputKey::Key(KeyCode::F8)
}

fn default_axis_lines() -> InputKey {
    InputKey::Key(KeyCode::F7)
}

fn default_auto_rotate() -> InputKey {
    InputKey::Key(KeyCode::F6)
}

fn default_third_person() -> InputKey {
    InputKey::Key(KeyCode::F5)
}

fn default_drop_block() -> InputKey {
    InputKey::Key(KeyCode::KeyB)
}

fn default_id_overlay() -> InputKey {
    InputKey::Key(KeyCode::F10)
}

fn default_break_liquids() -> InputKey {
    InputKey::Key(KeyCode::F9)
}

fn default_zoom_scroll() -> InputKey {
    InputKey::Key(KeyCode::KeyC)
}
