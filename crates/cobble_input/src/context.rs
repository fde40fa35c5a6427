use cobble_shared::block::{BlockId, BlockRegistry};
use cobble_shared::inventory::Inventory;
use cobble_shared::physics::{SelectedPos, AABB};
use cobble_shared::protocol::HackFlags;
use glam::{IVec3, Vec3};

use crate::click::ClickButton;
use crate::clock::Clock;
use crate::events::{EventSender, UserEvent};
use crate::hotkeys::HotkeyRegistry;
use crate::keybinds::KeyBinds;
use crate::keys::{InputKey, PressedKeys};
use crate::options::GameOptions;
use crate::screen::{ScreenFactory, Screens};

pub type EntityId = u8;

/// Entity id the server uses for the local player.
pub const SELF_ID: EntityId = 255;

pub trait World {
    /// Width, height and length in blocks.
    fn dimensions(&self) -> IVec3;

    fn contains(&self, pos: IVec3) -> bool {
        let size = self.dimensions();
        pos.cmpge(IVec3::ZERO).all() && pos.cmplt(size).all()
    }

    fn block(&self, pos: IVec3) -> BlockId;

    fn set_block(&mut self, pos: IVec3, block: BlockId);
}

pub trait Entities {
    /// Bounding box of a live entity, `None` when the slot is unused.
    fn bounds(&self, id: EntityId) -> Option<AABB>;

    /// Entity nearest the local player, or [`SELF_ID`] when there is none.
    fn closest_to_player(&self) -> EntityId;
}

pub trait LocalPlayer {
    fn position(&self) -> Vec3;

    /// Where the player ends up after the current physics tick.
    fn next_position(&self) -> Vec3;

    fn size(&self) -> Vec3;

    fn bounds(&self) -> AABB {
        AABB::from_position_size(self.position(), self.size())
    }

    /// Degrees clockwise from north.
    fn heading(&self) -> f32;

    fn pitch(&self) -> f32;

    fn hacks(&self) -> HackFlags;

    /// Moves the player without interpolating from the old position.
    fn teleport(&mut self, pos: Vec3);

    /// Movement keys; returns true when the key was used.
    fn handles_key(&mut self, key: InputKey) -> bool;
}

/// A click as reported to the server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerClick {
    pub button: ClickButton,
    pub pressed: bool,
    pub target_entity: EntityId,
    pub selection: SelectedPos,
    pub heading: f32,
    pub pitch: f32,
}

pub trait ClickSink {
    fn supports_player_click(&self) -> bool;

    fn send_player_click(&mut self, click: &PlayerClick);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Normal,
    Minimised,
    Fullscreen,
}

pub trait Window {
    fn close(&mut self);

    fn state(&self) -> WindowState;

    fn enter_fullscreen(&mut self);

    fn exit_fullscreen(&mut self);
}

pub trait CameraControl {
    /// Lets the active camera use a scroll delta, e.g. to move a third-person
    /// camera closer. Returns true when consumed.
    fn zoom(&mut self, delta: f32) -> bool;

    /// Switches to the next camera (first person, third person, ...).
    fn cycle_active(&mut self);
}

pub trait Chat {
    /// Shows a message locally without sending it.
    fn add_message(&mut self, text: &str);

    fn send_message(&mut self, text: &str);
}

pub trait HeldBlockView {
    fn click_anim(&mut self, digging: bool);
}

/// Everything the input session reads or mutates while handling one event.
pub struct InputContext<'a> {
    pub screens: &'a mut Screens,
    pub factory: &'a mut dyn ScreenFactory,
    pub world: &'a mut dyn World,
    pub blocks: &'a BlockRegistry,
    pub entities: &'a dyn Entities,
    pub player: &'a mut dyn LocalPlayer,
    pub selection: &'a SelectedPos,
    pub net: &'a mut dyn ClickSink,
    pub inventory: &'a mut Inventory,
    pub events: &'a EventSender<UserEvent>,
    pub keys: &'a PressedKeys,
    pub binds: &'a KeyBinds,
    pub hotkeys: &'a HotkeyRegistry,
    pub options: &'a mut GameOptions,
    pub window: &'a mut dyn Window,
    pub camera: &'a mut dyn CameraControl,
    pub chat: &'a mut dyn Chat,
    pub held_block: &'a mut dyn HeldBlockView,
    pub clock: &'a dyn Clock,
}

impl InputContext<'_> {
    pub fn raise(&self, event: UserEvent) {
        self.events.raise(event);
    }

    pub fn grabs_input(&self) -> bool {
        self.screens.input_grab()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}
