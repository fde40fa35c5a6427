use cobble_input::events::{EventSender, UserEvent};
use cobble_input::screen::{Screen, ScreenFactory, ScreenKind};
use cobble_input::InputKey;
use cobble_shared::block::{BlockId, BlockRegistry};
use tracing::info;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// In-game menu. Swallows everything while open.
pub struct PauseScreen;

impl Screen for PauseScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Pause
    }

    fn closable(&self) -> bool {
        true
    }

    fn grabs_input(&self) -> bool {
        true
    }

    fn handles_key_down(&mut self, _key: InputKey) -> bool {
        true
    }

    fn handles_pointer_down(&mut self, _x: i32, _y: i32, _button: MouseButton) -> bool {
        true
    }

    fn handles_pointer_up(&mut self, _x: i32, _y: i32, _button: MouseButton) -> bool {
        true
    }

    fn handles_mouse_scroll(&mut self, _delta: f32) -> bool {
        true
    }
}

pub struct ChatInputScreen {
    text: String,
    events: EventSender<UserEvent>,
    /// Set when opened by a key-down; the character typed by that same key
    /// arrives after the screen is open and must not end up in the text.
    skip_next_char: bool,
}

impl ChatInputScreen {
    pub fn new(text: &str, events: EventSender<UserEvent>) -> Self {
        Self {
            text: text.to_owned(),
            events,
            skip_next_char: false,
        }
    }

    pub fn opened_by_key(text: &str, events: EventSender<UserEvent>) -> Self {
        Self {
            skip_next_char: true,
            ..Self::new(text, events)
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Screen for ChatInputScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::ChatInput
    }

    fn closable(&self) -> bool {
        true
    }

    fn grabs_input(&self) -> bool {
        true
    }

    fn handles_key_down(&mut self, key: InputKey) -> bool {
        self.skip_next_char = false;
        match key {
            InputKey::Key(KeyCode::Backspace) => {
                self.text.pop();
            }
            InputKey::Key(KeyCode::Enter | KeyCode::NumpadEnter) => {
                self.events
                    .raise(UserEvent::ChatSubmitted(std::mem::take(&mut self.text)));
            }
            _ => {}
        }
        true
    }

    fn handles_key_press(&mut self, ch: char) -> bool {
        if std::mem::take(&mut self.skip_next_char) {
            return true;
        }
        if !ch.is_control() {
            self.text.push(ch);
        }
        true
    }

    fn handles_mouse_scroll(&mut self, _delta: f32) -> bool {
        true
    }
}

/// Lists block ids next to their names. Doesn't block gameplay.
pub struct TexIdsOverlay {
    rows: Vec<String>,
}

impl TexIdsOverlay {
    pub fn new(blocks: &BlockRegistry) -> Self {
        let rows = (0..blocks.len())
            .map(|idx| {
                let id = BlockId(idx as u16);
                format!("{idx:>3} {}", blocks.get_properties(id).name)
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }
}

impl Screen for TexIdsOverlay {
    fn kind(&self) -> ScreenKind {
        ScreenKind::TexIdsOverlay
    }
}

pub struct ScreenBuilder {
    blocks: BlockRegistry,
    events: EventSender<UserEvent>,
}

impl ScreenBuilder {
    pub fn new(blocks: BlockRegistry, events: EventSender<UserEvent>) -> Self {
        Self { blocks, events }
    }
}

impl ScreenFactory for ScreenBuilder {
    fn pause_screen(&mut self) -> Box<dyn Screen> {
        Box::new(PauseScreen)
    }

    fn chat_input(&mut self, text: &str) -> Box<dyn Screen> {
        Box::new(ChatInputScreen::opened_by_key(text, self.events.clone()))
    }

    fn tex_ids_overlay(&mut self) -> Box<dyn Screen> {
        let overlay = TexIdsOverlay::new(&self.blocks);
        for row in overlay.rows() {
            info!("{row}");
        }
        Box::new(overlay)
    }
}

#[cfg(test)]
mod tests {
    use cobble_input::events::{self, UserEvent};
    use cobble_input::screen::Screen;
    use cobble_input::InputKey;
    use cobble_shared::block::register_default_blocks;
    use winit::keyboard::KeyCode;

    use super::{ChatInputScreen, TexIdsOverlay};

    #[test]
    fn chat_input_edits_and_submits() {
        let (tx, rx) = events::channel();
        let mut screen = ChatInputScreen::new("/tp ", tx);

        for ch in "12\u{8}".chars() {
            assert!(screen.handles_key_press(ch));
        }
        assert_eq!(screen.text(), "/tp 12");

        screen.handles_key_down(InputKey::Key(KeyCode::Backspace));
        assert_eq!(screen.text(), "/tp 1");

        assert!(screen.handles_key_down(InputKey::Key(KeyCode::Enter)));
        assert_eq!(rx.drain(), vec![UserEvent::ChatSubmitted("/tp 1".to_string())]);
        assert_eq!(screen.text(), "");
    }

    #[test]
    fn character_of_the_opening_key_is_skipped() {
        let (tx, rx) = events::channel();
        let mut screen = ChatInputScreen::opened_by_key("/tp ", tx);

        assert!(screen.handles_key_press('g'));
        assert_eq!(screen.text(), "/tp ");
        screen.handles_key_press('1');
        screen.handles_key_down(InputKey::Key(KeyCode::Enter));
        assert_eq!(rx.drain(), vec![UserEvent::ChatSubmitted("/tp 1".to_string())]);
    }

    #[test]
    fn skip_ends_at_the_next_key_down() {
        let (tx, _rx) = events::channel();
        let mut screen = ChatInputScreen::opened_by_key("/me ", tx);

        screen.handles_key_down(InputKey::Key(KeyCode::KeyH));
        screen.handles_key_press('h');
        assert_eq!(screen.text(), "/me h");
    }

    #[test]
    fn overlay_lists_every_block() {
        let blocks = register_default_blocks();
        let overlay = TexIdsOverlay::new(&blocks);

        assert_eq!(overlay.rows().len(), blocks.len());
        assert!(overlay.rows()[0].ends_with("air"));
        assert!(!overlay.grabs_input());
    }
}
