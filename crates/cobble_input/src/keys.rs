use std::fmt;

use bitflags::bitflags;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// A keyboard key or mouse button; bindings may use either.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKey {
    Key(KeyCode),
    Mouse(MouseButton),
}

impl From<KeyCode> for InputKey {
    fn from(code: KeyCode) -> Self {
        InputKey::Key(code)
    }
}

impl From<MouseButton> for InputKey {
    fn from(button: MouseButton) -> Self {
        InputKey::Mouse(button)
    }
}

impl fmt::Display for InputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKey::Key(code) => {
                let debug = format!("{code:?}");
                let label = debug
                    .strip_prefix("Key")
                    .or_else(|| debug.strip_prefix("Digit"))
                    .unwrap_or(&debug);
                f.write_str(label)
            }
            InputKey::Mouse(button) => write!(f, "{button:?}Mouse"),
        }
    }
}

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Raw "is it held right now" state, fed by the platform layer.
#[derive(Debug, Default, Clone)]
pub struct PressedKeys {
    pressed: FxHashSet<InputKey>,
}

impl PressedKeys {
    /// Returns true if the key was not already held.
    pub fn press(&mut self, key: impl Into<InputKey>) -> bool {
        self.pressed.insert(key.into())
    }

    pub fn release(&mut self, key: impl Into<InputKey>) {
        self.pressed.remove(&key.into());
    }

    pub fn is_pressed(&self, key: impl Into<InputKey>) -> bool {
        self.pressed.contains(&key.into())
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    pub fn modifiers(&self) -> Modifiers {
        let mut modifiers = Modifiers::empty();
        let held = |left, right| self.is_pressed(left) || self.is_pressed(right);

        if held(KeyCode::ShiftLeft, KeyCode::ShiftRight) {
            modifiers |= Modifiers::SHIFT;
        }
        if held(KeyCode::ControlLeft, KeyCode::ControlRight) {
            modifiers |= Modifiers::CTRL;
        }
        if held(KeyCode::AltLeft, KeyCode::AltRight) {
            modifiers |= Modifiers::ALT;
        }
        if held(KeyCode::SuperLeft, KeyCode::SuperRight) {
            modifiers |= Modifiers::SUPER;
        }
        modifiers
    }
}
