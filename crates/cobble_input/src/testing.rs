//! Recording fakes for every collaborator of the input session.

use std::cell::Cell;

use cobble_shared::block::{register_default_blocks, BlockId, BlockRegistry};
use cobble_shared::inventory::Inventory;
use cobble_shared::physics::{SelectedPos, AABB};
use cobble_shared::protocol::HackFlags;
use glam::{IVec3, Vec3};
use rustc_hash::FxHashMap;
use winit::keyboard::KeyCode;

use crate::config::{InputSettings, PlatformQuirks};
use crate::context::{
    CameraControl, Chat, ClickSink, Entities, EntityId, HeldBlockView, InputContext, LocalPlayer,
    PlayerClick, Window, WindowState, World, SELF_ID,
};
use crate::clock::ManualClock;
use crate::events::{channel, EventReceiver, EventSender, UserEvent};
use crate::hotkeys::HotkeyRegistry;
use crate::keybinds::KeyBinds;
use crate::keys::{InputKey, PressedKeys};
use crate::options::GameOptions;
use crate::screen::{Screen, ScreenFactory, ScreenKind, Screens};
use crate::session::InputSession;

pub struct FakeWorld {
    pub size: IVec3,
    blocks: FxHashMap<IVec3, BlockId>,
}

impl FakeWorld {
    pub fn get(&self, pos: IVec3) -> BlockId {
        self.blocks.get(&pos).copied().unwrap_or(BlockId::AIR)
    }

    pub fn set(&mut self, pos: IVec3, block: BlockId) {
        self.blocks.insert(pos, block);
    }
}

impl World for FakeWorld {
    fn dimensions(&self) -> IVec3 {
        self.size
    }

    fn block(&self, pos: IVec3) -> BlockId {
        self.get(pos)
    }

    fn set_block(&mut self, pos: IVec3, block: BlockId) {
        self.set(pos, block);
    }
}

pub struct FakeEntities {
    boxes: FxHashMap<EntityId, AABB>,
    pub closest: EntityId,
    pub closest_calls: Cell<usize>,
}

impl FakeEntities {
    pub fn set(&mut self, id: EntityId, bounds: AABB) {
        self.boxes.insert(id, bounds);
    }
}

impl Entities for FakeEntities {
    fn bounds(&self, id: EntityId) -> Option<AABB> {
        self.boxes.get(&id).copied()
    }

    fn closest_to_player(&self) -> EntityId {
        self.closest_calls.set(self.closest_calls.get() + 1);
        self.closest
    }
}

pub struct FakePlayer {
    pub position: Vec3,
    pub next_position: Vec3,
    pub size: Vec3,
    pub heading: f32,
    pub pitch: f32,
    pub hacks: HackFlags,
    pub teleports: Vec<Vec3>,
    pub movement_keys: Vec<InputKey>,
    pub moved: Vec<InputKey>,
}

impl LocalPlayer for FakePlayer {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn next_position(&self) -> Vec3 {
        self.next_position
    }

    fn size(&self) -> Vec3 {
        self.size
    }

    fn heading(&self) -> f32 {
        self.heading
    }

    fn pitch(&self) -> f32 {
        self.pitch
    }

    fn hacks(&self) -> HackFlags {
        self.hacks
    }

    fn teleport(&mut self, pos: Vec3) {
        self.position = pos;
        self.next_position = pos;
        self.teleports.push(pos);
    }

    fn handles_key(&mut self, key: InputKey) -> bool {
        if !self.movement_keys.contains(&key) {
            return false;
        }
        self.moved.push(key);
        true
    }
}

pub struct FakeNet {
    pub supported: bool,
    pub clicks: Vec<PlayerClick>,
}

impl ClickSink for FakeNet {
    fn supports_player_click(&self) -> bool {
        self.supported
    }

    fn send_player_click(&mut self, click: &PlayerClick) {
        self.clicks.push(*click);
    }
}

pub struct FakeWindow {
    pub state: WindowState,
    pub closed: bool,
}

impl Window for FakeWindow {
    fn close(&mut self) {
        self.closed = true;
    }

    fn state(&self) -> WindowState {
        self.state
    }

    fn enter_fullscreen(&mut self) {
        self.state = WindowState::Fullscreen;
    }

    fn exit_fullscreen(&mut self) {
        self.state = WindowState::Normal;
    }
}

#[derive(Default)]
pub struct FakeCamera {
    pub consumes_zoom: bool,
    pub zoom_calls: usize,
    pub cycles: usize,
}

impl CameraControl for FakeCamera {
    fn zoom(&mut self, _delta: f32) -> bool {
        self.zoom_calls += 1;
        self.consumes_zoom
    }

    fn cycle_active(&mut self) {
        self.cycles += 1;
    }
}

#[derive(Default)]
pub struct FakeChat {
    pub local: Vec<String>,
    pub sent: Vec<String>,
}

impl Chat for FakeChat {
    fn add_message(&mut self, text: &str) {
        self.local.push(text.to_string());
    }

    fn send_message(&mut self, text: &str) {
        self.sent.push(text.to_string());
    }
}

#[derive(Default)]
pub struct FakeHeldBlock {
    pub swings: Vec<bool>,
}

impl HeldBlockView for FakeHeldBlock {
    fn click_anim(&mut self, digging: bool) {
        self.swings.push(digging);
    }
}

/// Screen whose every handler answers `consumes`.
pub struct TestScreen {
    pub kind: ScreenKind,
    pub closable: bool,
    pub grabs: bool,
    pub consumes: bool,
}

impl TestScreen {
    pub fn grabbing(name: &'static str) -> Self {
        Self {
            kind: ScreenKind::Other(name),
            closable: false,
            grabs: true,
            consumes: false,
        }
    }

    pub fn consuming(name: &'static str) -> Self {
        Self {
            kind: ScreenKind::Other(name),
            closable: false,
            grabs: false,
            consumes: true,
        }
    }

    pub fn menu(name: &'static str) -> Self {
        Self {
            kind: ScreenKind::Other(name),
            closable: true,
            grabs: true,
            consumes: false,
        }
    }
}

impl Screen for TestScreen {
    fn kind(&self) -> ScreenKind {
        self.kind
    }

    fn closable(&self) -> bool {
        self.closable
    }

    fn grabs_input(&self) -> bool {
        self.grabs
    }

    fn handles_key_down(&mut self, _key: InputKey) -> bool {
        self.consumes
    }

    fn handles_key_up(&mut self, _key: InputKey) -> bool {
        self.consumes
    }

    fn handles_key_press(&mut self, _ch: char) -> bool {
        self.consumes
    }

    fn handles_pointer_move(&mut self, _x: i32, _y: i32) -> bool {
        self.consumes
    }

    fn handles_mouse_scroll(&mut self, _delta: f32) -> bool {
        self.consumes
    }
}

#[derive(Default)]
pub struct FakeFactory {
    pub chat_inputs: Vec<String>,
}

impl ScreenFactory for FakeFactory {
    fn pause_screen(&mut self) -> Box<dyn Screen> {
        Box::new(TestScreen {
            kind: ScreenKind::Pause,
            closable: true,
            grabs: true,
            consumes: false,
        })
    }

    fn chat_input(&mut self, text: &str) -> Box<dyn Screen> {
        self.chat_inputs.push(text.to_string());
        Box::new(TestScreen {
            kind: ScreenKind::ChatInput,
            closable: true,
            grabs: true,
            consumes: false,
        })
    }

    fn tex_ids_overlay(&mut self) -> Box<dyn Screen> {
        Box::new(TestScreen {
            kind: ScreenKind::TexIdsOverlay,
            closable: false,
            grabs: false,
            consumes: false,
        })
    }
}

/// Owns one of everything an [`InputContext`] borrows.
pub struct Harness {
    pub screens: Screens,
    pub factory: FakeFactory,
    pub world: FakeWorld,
    pub blocks: BlockRegistry,
    pub entities: FakeEntities,
    pub player: FakePlayer,
    pub selection: SelectedPos,
    pub net: FakeNet,
    pub inventory: Inventory,
    pub events: EventSender<UserEvent>,
    pub receiver: EventReceiver<UserEvent>,
    pub keys: PressedKeys,
    pub binds: KeyBinds,
    pub hotkeys: HotkeyRegistry,
    pub options: GameOptions,
    pub window: FakeWindow,
    pub camera: FakeCamera,
    pub chat: FakeChat,
    pub held_block: FakeHeldBlock,
    pub clock: ManualClock,
    pub settings: InputSettings,
    pub quirks: PlatformQuirks,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_world_size(IVec3::new(16, 64, 16))
    }

    pub fn with_world_size(size: IVec3) -> Self {
        let settings = InputSettings::default();
        let (events, receiver) = channel();
        let binds = settings.keybinds.clone();
        let movement_keys = vec![binds.forward, binds.back, binds.left, binds.right, binds.jump];

        Self {
            screens: Screens::new(),
            factory: FakeFactory::default(),
            world: FakeWorld {
                size,
                blocks: FxHashMap::default(),
            },
            blocks: register_default_blocks(),
            entities: FakeEntities {
                boxes: FxHashMap::default(),
                closest: SELF_ID,
                closest_calls: Cell::new(0),
            },
            player: FakePlayer {
                position: Vec3::new(8.5, 40.0, 8.5),
                next_position: Vec3::new(8.5, 40.0, 8.5),
                size: Vec3::new(0.6, 1.8, 0.6),
                heading: 0.0,
                pitch: 0.0,
                hacks: HackFlags::empty(),
                teleports: Vec::new(),
                movement_keys,
                moved: Vec::new(),
            },
            selection: SelectedPos::invalid(),
            net: FakeNet {
                supported: true,
                clicks: Vec::new(),
            },
            inventory: Inventory::new(),
            events,
            receiver,
            keys: PressedKeys::default(),
            binds,
            hotkeys: HotkeyRegistry::default(),
            options: GameOptions::from_settings(&settings),
            window: FakeWindow {
                state: WindowState::Normal,
                closed: false,
            },
            camera: FakeCamera::default(),
            chat: FakeChat::default(),
            held_block: FakeHeldBlock::default(),
            clock: ManualClock::new(0),
            settings,
            quirks: PlatformQuirks {
                escape_closes_on_key_up: false,
                super_q_quits: false,
            },
        }
    }

    pub fn session(&self) -> InputSession {
        InputSession::with_quirks(&self.settings, self.quirks)
    }

    pub fn ctx(&mut self) -> InputContext<'_> {
        InputContext {
            screens: &mut self.screens,
            factory: &mut self.factory,
            world: &mut self.world,
            blocks: &self.blocks,
            entities: &self.entities,
            player: &mut self.player,
            selection: &self.selection,
            net: &mut self.net,
            inventory: &mut self.inventory,
            events: &self.events,
            keys: &self.keys,
            binds: &self.binds,
            hotkeys: &self.hotkeys,
            options: &mut self.options,
            window: &mut self.window,
            camera: &mut self.camera,
            chat: &mut self.chat,
            held_block: &mut self.held_block,
            clock: &self.clock,
        }
    }

    pub fn drain_events(&self) -> Vec<UserEvent> {
        self.receiver.drain()
    }

    /// Presses `key` and routes the key-down.
    pub fn key_down(
        &mut self,
        session: &mut InputSession,
        key: impl Into<InputKey>,
    ) -> Option<crate::routing::KeyDownStage> {
        let key = key.into();
        let repeat = !self.keys.press(key);
        session.on_key_down(&mut self.ctx(), key, repeat)
    }

    pub fn key_up(&mut self, session: &mut InputSession, key: impl Into<InputKey>) {
        let key = key.into();
        self.keys.release(key);
        session.on_key_up(&mut self.ctx(), key);
    }

    pub fn hold(&mut self, key: KeyCode) {
        self.keys.press(key);
    }
}
