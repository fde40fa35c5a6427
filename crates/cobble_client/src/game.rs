use std::time::Duration;

use cobble_input::clock::SystemClock;
use cobble_input::context::{Chat, World};
use cobble_input::events::{self, EventReceiver, EventSender};
use cobble_input::hotkeys::HotkeyRegistry;
use cobble_input::keybinds::KeyBinds;
use cobble_input::options::GameOptions;
use cobble_input::screen::{ScreenKind, Screens};
use cobble_input::{InputContext, InputSession, InputSettings, PressedKeys, UserEvent};
use cobble_shared::block::{register_default_blocks, BlockRegistry};
use cobble_shared::inventory::Inventory;
use cobble_shared::physics::{pick_selection, Ray, SelectedPos};
use cobble_shared::protocol::{C2S, S2C};
use glam::Vec3;
use tracing::{debug, info, warn};

use crate::camera::Camera;
use crate::chat::ChatLog;
use crate::entities::RemoteEntities;
use crate::net::{ClientNet, ServerLink};
use crate::player::{look_direction, Player};
use crate::screens::ScreenBuilder;
use crate::window::{HeldBlockAnim, WindowHandle};
use crate::world::ClientWorld;

/// How far away blocks and entities can be targeted.
pub const REACH: f32 = 5.0;
/// Long frames (window drags, breakpoints) must not tunnel the player through the floor.
const MAX_PHYSICS_STEP: f32 = 0.1;

/// Everything the input session works against, owned in one place.
pub struct GameState {
    pub screens: Screens,
    pub factory: ScreenBuilder,
    pub world: ClientWorld,
    pub blocks: BlockRegistry,
    pub entities: RemoteEntities,
    pub player: Player,
    pub selection: SelectedPos,
    pub link: ServerLink,
    pub inventory: Inventory,
    pub keys: PressedKeys,
    pub binds: KeyBinds,
    pub hotkeys: HotkeyRegistry,
    pub options: GameOptions,
    pub window: WindowHandle,
    pub camera: Camera,
    pub chat: ChatLog,
    pub held_block: HeldBlockAnim,
    pub mouse_sensitivity: f32,
    clock: SystemClock,
    events: EventSender<UserEvent>,
    event_rx: EventReceiver<UserEvent>,
}

impl GameState {
    pub fn new(settings: &InputSettings) -> Self {
        let (events, event_rx) = events::channel();
        let blocks = register_default_blocks();
        let world = ClientWorld::default();
        let options = GameOptions::from_settings(settings);

        let size = world.dimensions();
        let (spawn_x, spawn_z) = (size.x / 2, size.z / 2);
        let spawn = Vec3::new(
            spawn_x as f32 + 0.5,
            world.surface_height(spawn_x, spawn_z) as f32,
            spawn_z as f32 + 0.5,
        );

        Self {
            screens: Screens::new(),
            factory: ScreenBuilder::new(blocks.clone(), events.clone()),
            world,
            blocks,
            entities: RemoteEntities::default(),
            player: Player::new(spawn, settings.keybinds.clone()),
            selection: SelectedPos::invalid(),
            link: ServerLink::default(),
            inventory: Inventory::new(),
            keys: PressedKeys::default(),
            binds: settings.keybinds.clone(),
            hotkeys: HotkeyRegistry::new(settings.hotkeys.iter().cloned()),
            camera: Camera::new(options.fov),
            options,
            window: WindowHandle::default(),
            chat: ChatLog::default(),
            held_block: HeldBlockAnim::default(),
            mouse_sensitivity: settings.mouse_sensitivity,
            clock: SystemClock,
            events,
            event_rx,
        }
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
            net: &mut self.link,
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

    /// Re-targets the block and entity under the crosshair.
    pub fn update_selection(&mut self) {
        let ray = Ray {
            origin: self.player.eye_position(),
            direction: look_direction(self.player.heading, self.player.pitch),
        };

        let world = &self.world;
        let blocks = &self.blocks;
        let breakable_liquids = self.options.breakable_liquids;
        self.selection = pick_selection(&ray, REACH, |cell| {
            world.contains(cell) && blocks.can_pick(world.block(cell), breakable_liquids)
        });
        self.entities.set_view(ray, REACH);
    }

    /// One frame: physics, network, held clicks, then queued events.
    pub fn tick(&mut self, session: &mut InputSession, dt: Duration) {
        let secs = dt.as_secs_f32().min(MAX_PHYSICS_STEP);
        self.player.update(secs, &self.keys, &self.world, &self.blocks);
        self.held_block.update(secs);
        self.update_selection();

        let mut incoming = Vec::new();
        if let Some(net) = self.link.net.as_mut() {
            net.update(dt);
            incoming = net.receive();
        }
        for msg in incoming {
            self.handle_server_message(session, msg);
        }

        session.poll_actions(&mut self.ctx());
        self.process_events(session);
        self.flush_chat();
    }

    pub fn handle_server_message(&mut self, session: &mut InputSession, msg: S2C) {
        match msg {
            S2C::HandshakeAccept {
                player_id,
                world_size,
                supports_player_click,
            } => {
                info!(
                    "Joined as player {player_id}, world {world_size}, player clicks: {supports_player_click}"
                );
                if world_size != self.world.dimensions() {
                    match ClientWorld::new(world_size) {
                        Some(world) => self.world = world,
                        None => warn!("ignoring unusable world size {world_size} from server"),
                    }
                }
            }
            S2C::HandshakeReject { reason } => {
                warn!("Server rejected handshake: {reason}");
                self.chat.add_message(&format!("Disconnected: {reason}"));
            }
            S2C::BlockChange { world_pos, block } => {
                self.world.set_block(world_pos, block);
            }
            S2C::HackPermissions { hacks } => {
                self.player.hacks = hacks;
                self.camera
                    .set_third_person_allowed(hacks.third_person_allowed());
                session.on_hack_permissions_changed(&mut self.ctx());
            }
            S2C::HeldBlockLock { locked } => {
                self.inventory.can_change_selected = !locked;
            }
            S2C::EntityUpdate { id, position } => self.entities.update(id, position),
            S2C::EntityRemove { id } => self.entities.remove(id),
            S2C::Chat {
                sender_name,
                message,
            } => {
                self.chat.add_message(&format!("{sender_name}: {message}"));
            }
        }
    }

    pub fn process_events(&mut self, session: &mut InputSession) {
        for event in self.event_rx.drain() {
            match event {
                UserEvent::BlockChanged { pos, new, .. } => {
                    self.link.send(&C2S::BlockEdit {
                        world_pos: pos,
                        new_block: new,
                    });
                }
                UserEvent::ChatSubmitted(text) => {
                    if self.screens.remove_kind(ScreenKind::ChatInput) {
                        session.on_screens_changed(&mut self.ctx());
                    }
                    self.chat.send_message(&text);
                }
                UserEvent::FovChanged(fov) => self.camera.fov = fov,
                UserEvent::ViewDistanceChanged(distance) => {
                    info!("View distance set to {distance}");
                }
                UserEvent::HeldBlockChanged => {
                    debug!("Holding {:?}", self.inventory.selected_block());
                }
            }
        }
    }

    pub fn window_title(&self, fps: f32) -> String {
        let kinds = self.screens.kinds();
        if kinds.contains(&ScreenKind::Pause) {
            return "Cobble | Paused".to_owned();
        }
        if kinds.contains(&ScreenKind::ChatInput) {
            return "Cobble | Chat".to_owned();
        }
        if !self.options.show_fps || self.options.hide_gui {
            return "Cobble".to_owned();
        }

        let server = match self.link.net.as_ref().and_then(ClientNet::player_id) {
            Some(id) => format!("player {id}"),
            None => "offline".to_owned(),
        };
        let held = &self.blocks.get_properties(self.inventory.selected_block()).name;
        let position = self.player.position;
        format!(
            "Cobble | FPS: {:.0} | XYZ: {:.1} / {:.1} / {:.1} | Camera: {:?} | FOV: {} | Players: {} | Block: {} | Server: {} | {}",
            fps.round(),
            position.x,
            position.y,
            position.z,
            self.camera.mode,
            self.camera.fov,
            self.entities.len(),
            held,
            server,
            self.chat.last().unwrap_or_default(),
        )
    }

    fn flush_chat(&mut self) {
        for message in self.chat.take_outgoing() {
            if self.link.net.is_some() {
                self.link.send(&C2S::Chat { message });
            } else {
                self.chat.add_message(&message);
            }
        }
    }
}
