use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use crate::keys::{InputKey, Modifiers};

/// Text macro fired by a key combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotkey {
    pub trigger: KeyCode,
    #[serde(default)]
    pub modifiers: Modifiers,
    pub text: String,
    /// Open the text for editing instead of sending it straight away.
    #[serde(default)]
    pub stays_open: bool,
}

const MATCHED_MODIFIERS: Modifiers = Modifiers::SHIFT.union(Modifiers::CTRL).union(Modifiers::ALT);

#[derive(Debug, Default, Clone)]
pub struct HotkeyRegistry {
    hotkeys: Vec<Hotkey>,
}

impl HotkeyRegistry {
    pub fn new(hotkeys: impl IntoIterator<Item = Hotkey>) -> Self {
        let mut registry = Self::default();
        for hotkey in hotkeys {
            registry.add(hotkey);
        }
        registry
    }

    /// Adds `hotkey`, replacing any hotkey with the same trigger and modifiers.
    pub fn add(&mut self, mut hotkey: Hotkey) {
        hotkey.modifiers &= MATCHED_MODIFIERS;
        self.remove(hotkey.trigger, hotkey.modifiers);
        self.hotkeys.push(hotkey);
        // More specific combinations must be tried first.
        self.hotkeys
            .sort_by_key(|hotkey| std::cmp::Reverse(hotkey.modifiers.bits().count_ones()));
    }

    pub fn remove(&mut self, trigger: KeyCode, modifiers: Modifiers) -> bool {
        let before = self.hotkeys.len();
        self.hotkeys
            .retain(|hotkey| !(hotkey.trigger == trigger && hotkey.modifiers == modifiers));
        self.hotkeys.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hotkey> {
        self.hotkeys.iter()
    }

    /// Finds a hotkey for `key` whose modifiers are all held. Extra held modifiers
    /// are allowed, so Ctrl+Shift+G still fires a Ctrl+G hotkey when nothing more
    /// specific is registered.
    pub fn find_partial(&self, key: InputKey, held: Modifiers) -> Option<&Hotkey> {
        let InputKey::Key(code) = key else {
            return None;
        };
        let held = held & MATCHED_MODIFIERS;
        self.hotkeys
            .iter()
            .find(|hotkey| hotkey.trigger == code && held.contains(hotkey.modifiers))
    }
}
