use cobble_input::context::{LocalPlayer, World};
use cobble_input::keybinds::{KeyBind, KeyBinds};
use cobble_input::keys::{InputKey, PressedKeys};
use cobble_input::placement::touches_solid;
use cobble_shared::block::BlockRegistry;
use cobble_shared::physics::AABB;
use cobble_shared::protocol::HackFlags;
use glam::{Vec2, Vec3};

const WALK_SPEED: f32 = 4.3;
const FLY_SPEED: f32 = 10.0;
const JUMP_SPEED: f32 = 8.0;
const GRAVITY: f32 = 28.0;
const MAX_PITCH: f32 = 89.0;
/// Length of one physics tick, used to predict the next position.
const TICK_SECONDS: f32 = 0.05;
pub const EYE_HEIGHT: f32 = 1.62;

const MOVEMENT_BINDS: [KeyBind; 5] = [
    KeyBind::Forward,
    KeyBind::Back,
    KeyBind::Left,
    KeyBind::Right,
    KeyBind::Jump,
];

/// Unit vector for a heading (degrees clockwise from north) and pitch (degrees up).
pub fn look_direction(heading: f32, pitch: f32) -> Vec3 {
    let (heading, pitch) = (heading.to_radians(), pitch.to_radians());
    Vec3::new(
        heading.sin() * pitch.cos(),
        pitch.sin(),
        -heading.cos() * pitch.cos(),
    )
    .normalize_or_zero()
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    pub size: Vec3,
    pub heading: f32,
    pub pitch: f32,
    pub hacks: HackFlags,
    pub on_ground: bool,
    binds: KeyBinds,
}

impl Player {
    pub fn new(position: Vec3, binds: KeyBinds) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            size: Vec3::new(0.6, 1.8, 0.6),
            heading: 0.0,
            pitch: 0.0,
            hacks: HackFlags::ENABLED | HackFlags::THIRD_PERSON,
            on_ground: false,
            binds,
        }
    }

    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, EYE_HEIGHT, 0.0)
    }

    pub fn look(&mut self, delta: Vec2, sensitivity: f32) {
        self.heading = (self.heading + delta.x * sensitivity * 0.1).rem_euclid(360.0);
        self.pitch = (self.pitch - delta.y * sensitivity * 0.1).clamp(-MAX_PITCH, MAX_PITCH);
    }

    fn wish_dir(&self, keys: &PressedKeys) -> Vec3 {
        let heading = self.heading.to_radians();
        let forward = Vec3::new(heading.sin(), 0.0, -heading.cos());
        let right = Vec3::new(-forward.z, 0.0, forward.x);

        let mut dir = Vec3::ZERO;
        if self.binds.is_pressed(KeyBind::Forward, keys) {
            dir += forward;
        }
        if self.binds.is_pressed(KeyBind::Back, keys) {
            dir -= forward;
        }
        if self.binds.is_pressed(KeyBind::Right, keys) {
            dir += right;
        }
        if self.binds.is_pressed(KeyBind::Left, keys) {
            dir -= right;
        }
        dir.normalize_or_zero()
    }

    pub fn update(&mut self, dt: f32, keys: &PressedKeys, world: &dyn World, blocks: &BlockRegistry) {
        let jumping = self.binds.is_pressed(KeyBind::Jump, keys);
        let wish = self.wish_dir(keys);

        if self.hacks.noclip() {
            self.velocity = wish * FLY_SPEED;
            if jumping {
                self.velocity.y = FLY_SPEED;
            }
            self.position += self.velocity * dt;
            return;
        }

        self.velocity.x = wish.x * WALK_SPEED;
        self.velocity.z = wish.z * WALK_SPEED;
        if jumping && self.on_ground {
            self.velocity.y = JUMP_SPEED;
        }
        self.velocity.y -= GRAVITY * dt;

        let step = self.velocity * dt;
        self.on_ground = false;
        for axis in 0..3 {
            let mut moved = self.position;
            moved[axis] += step[axis];
            let bounds = AABB::from_position_size(moved, self.size);
            if touches_solid(world, blocks, &bounds) {
                if axis == 1 && step.y < 0.0 {
                    self.on_ground = true;
                }
                self.velocity[axis] = 0.0;
            } else {
                self.position = moved;
            }
        }
    }
}

impl LocalPlayer for Player {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn next_position(&self) -> Vec3 {
        self.position + self.velocity * TICK_SECONDS
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
        self.velocity = Vec3::ZERO;
    }

    /// Movement is read from held keys every frame; claiming the key here keeps
    /// it from also firing a hotkey.
    fn handles_key(&mut self, key: InputKey) -> bool {
        self.binds.find(&MOVEMENT_BINDS, key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use cobble_input::context::LocalPlayer;
    use cobble_input::keybinds::KeyBinds;
    use cobble_input::keys::{InputKey, PressedKeys};
    use cobble_shared::block::register_default_blocks;
    use glam::{IVec3, Vec2, Vec3};
    use winit::keyboard::KeyCode;

    use super::{look_direction, Player};
    use crate::world::ClientWorld;

    #[test]
    fn look_direction_follows_compass_heading() {
        assert!((look_direction(0.0, 0.0) - Vec3::NEG_Z).length() < 1e-5);
        assert!((look_direction(90.0, 0.0) - Vec3::X).length() < 1e-5);
        assert!((look_direction(0.0, 90.0) - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut player = Player::new(Vec3::ZERO, KeyBinds::default());
        player.look(Vec2::new(0.0, -10_000.0), 1.0);
        assert_eq!(player.pitch, 89.0);
    }

    #[test]
    fn player_lands_on_the_ground() {
        let mut world = ClientWorld::new(IVec3::new(16, 32, 16)).expect("small world");
        world.fill_flat(8);
        let blocks = register_default_blocks();
        let mut player = Player::new(Vec3::new(8.5, 12.0, 8.5), KeyBinds::default());
        let keys = PressedKeys::default();

        for _ in 0..200 {
            player.update(0.02, &keys, &world, &blocks);
        }
        assert!(player.on_ground);
        assert!(player.position.y >= 8.0 && player.position.y < 8.2);
    }

    #[test]
    fn movement_keys_are_claimed() {
        let mut player = Player::new(Vec3::ZERO, KeyBinds::default());
        assert!(player.handles_key(InputKey::Key(KeyCode::KeyW)));
        assert!(!player.handles_key(InputKey::Key(KeyCode::KeyT)));

        let mut keys = PressedKeys::default();
        keys.press(KeyCode::KeyW);
        assert!((player.wish_dir(&keys) - Vec3::NEG_Z).length() < 1e-5);
    }
}
