use winit::event::MouseButton;

use crate::keys::InputKey;

/// Stack priorities. Higher priority screens see events first.
pub mod priority {
    pub const MENU: u8 = 50;
    pub const TEX_IDS: u8 = 30;
    pub const INVENTORY: u8 = 20;
    pub const CHAT: u8 = 10;
    pub const HUD: u8 = 5;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScreenKind {
    Hud,
    Pause,
    ChatInput,
    TexIdsOverlay,
    Inventory,
    Other(&'static str),
}

/// A UI surface on the screen stack. Each handler returns true when it consumed
/// the event, which stops lower screens from seeing it.
pub trait Screen {
    fn kind(&self) -> ScreenKind;

    /// Escape closes this screen.
    fn closable(&self) -> bool {
        false
    }

    /// While open, gameplay keys and block clicks are ignored.
    fn grabs_input(&self) -> bool {
        false
    }

    fn handles_key_down(&mut self, _key: InputKey) -> bool {
        false
    }

    fn handles_key_up(&mut self, _key: InputKey) -> bool {
        false
    }

    fn handles_key_press(&mut self, _ch: char) -> bool {
        false
    }

    fn handles_pointer_move(&mut self, _x: i32, _y: i32) -> bool {
        false
    }

    fn handles_pointer_down(&mut self, _x: i32, _y: i32, _button: MouseButton) -> bool {
        false
    }

    fn handles_pointer_up(&mut self, _x: i32, _y: i32, _button: MouseButton) -> bool {
        false
    }

    fn handles_mouse_scroll(&mut self, _delta: f32) -> bool {
        false
    }
}

/// Builds the screens the input core opens on its own.
pub trait ScreenFactory {
    fn pause_screen(&mut self) -> Box<dyn Screen>;
    fn chat_input(&mut self, text: &str) -> Box<dyn Screen>;
    fn tex_ids_overlay(&mut self) -> Box<dyn Screen>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScreenId(u32);

struct Entry {
    id: ScreenId,
    priority: u8,
    screen: Box<dyn Screen>,
}

/// Active screens, highest priority first. Among equal priorities the most
/// recently added screen comes first.
#[derive(Default)]
pub struct Screens {
    entries: Vec<Entry>,
    next_id: u32,
}

impl Screens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, screen: Box<dyn Screen>, priority: u8) -> ScreenId {
        let id = ScreenId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let index = self
            .entries
            .iter()
            .position(|entry| entry.priority <= priority)
            .unwrap_or(self.entries.len());
        tracing::debug!("opening {:?} screen at stack index {index}", screen.kind());
        self.entries.insert(
            index,
            Entry {
                id,
                priority,
                screen,
            },
        );
        id
    }

    pub fn remove(&mut self, id: ScreenId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn remove_kind(&mut self, kind: ScreenKind) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.screen.kind() != kind);
        self.entries.len() != before
    }

    pub fn contains_kind(&self, kind: ScreenKind) -> bool {
        self.entries.iter().any(|entry| entry.screen.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kinds(&self) -> Vec<ScreenKind> {
        self.entries.iter().map(|entry| entry.screen.kind()).collect()
    }

    /// Whether any open screen holds input focus.
    pub fn input_grab(&self) -> bool {
        self.entries.iter().any(|entry| entry.screen.grabs_input())
    }

    /// Topmost screen that escape may close.
    pub fn closable(&self) -> Option<ScreenId> {
        self.entries
            .iter()
            .find(|entry| entry.screen.closable())
            .map(|entry| entry.id)
    }

    /// Offers an event to each screen in stack order until one consumes it.
    pub fn offer(&mut self, mut handler: impl FnMut(&mut dyn Screen) -> bool) -> bool {
        self.entries
            .iter_mut()
            .any(|entry| handler(entry.screen.as_mut()))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use winit::keyboard::KeyCode;

    use super::{priority, Screen, ScreenKind, Screens};
    use crate::keys::InputKey;

    struct Probe {
        name: &'static str,
        consumes: bool,
        closable: bool,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Screen for Probe {
        fn kind(&self) -> ScreenKind {
            ScreenKind::Other(self.name)
        }

        fn closable(&self) -> bool {
            self.closable
        }

        fn handles_key_down(&mut self, _key: InputKey) -> bool {
            self.log.borrow_mut().push(self.name);
            self.consumes
        }
    }

    fn probe(
        name: &'static str,
        consumes: bool,
        log: &Rc<RefCell<Vec<&'static str>>>,
    ) -> Box<Probe> {
        Box::new(Probe {
            name,
            consumes,
            closable: false,
            log: Rc::clone(log),
        })
    }

    #[test]
    fn higher_priority_and_newer_screens_see_events_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut screens = Screens::new();
        screens.add(probe("hud", false, &log), priority::HUD);
        screens.add(probe("menu", false, &log), priority::MENU);
        screens.add(probe("chat", false, &log), priority::CHAT);
        screens.add(probe("chat2", false, &log), priority::CHAT);

        assert!(!screens.offer(|screen| screen.handles_key_down(InputKey::Key(KeyCode::KeyA))));
        assert_eq!(*log.borrow(), vec!["menu", "chat2", "chat", "hud"]);
    }

    #[test]
    fn first_consumer_short_circuits() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut screens = Screens::new();
        screens.add(probe("hud", false, &log), priority::HUD);
        screens.add(probe("menu", true, &log), priority::MENU);

        assert!(screens.offer(|screen| screen.handles_key_down(InputKey::Key(KeyCode::KeyA))));
        assert_eq!(*log.borrow(), vec!["menu"]);
    }

    #[test]
    fn closable_finds_topmost_closable_screen() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut screens = Screens::new();
        screens.add(probe("hud", false, &log), priority::HUD);
        assert_eq!(screens.closable(), None);

        let mut menu = probe("menu", false, &log);
        menu.closable = true;
        let id = screens.add(menu, priority::MENU);
        assert_eq!(screens.closable(), Some(id));

        assert!(screens.remove(id));
        assert!(!screens.remove(id));
        assert_eq!(screens.len(), 1);
        assert!(screens.remove_kind(ScreenKind::Other("hud")));
        assert!(screens.is_empty());
    }
}
