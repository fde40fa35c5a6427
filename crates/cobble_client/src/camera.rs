use cobble_input::context::CameraControl;
use tracing::info;

const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 16.0;
const DEFAULT_DISTANCE: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    FirstPerson,
    ThirdPerson,
    /// Third person looking back at the player's face.
    ThirdPersonFront,
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub mode: CameraMode,
    pub distance: f32,
    /// Mirrors the server's hack permissions.
    pub third_person_allowed: bool,
    pub fov: i32,
}

impl Camera {
    pub fn new(fov: i32) -> Self {
        Self {
            mode: CameraMode::FirstPerson,
            distance: DEFAULT_DISTANCE,
            third_person_allowed: true,
            fov,
        }
    }

    pub fn is_third_person(&self) -> bool {
        self.mode != CameraMode::FirstPerson
    }

    /// Drops back to first person when third person gets revoked.
    pub fn set_third_person_allowed(&mut self, allowed: bool) {
        self.third_person_allowed = allowed;
        if !allowed && self.is_third_person() {
            info!("Third person camera no longer allowed");
            self.mode = CameraMode::FirstPerson;
        }
    }
}

impl CameraControl for Camera {
    fn zoom(&mut self, delta: f32) -> bool {
        if !self.is_third_person() {
            return false;
        }
        self.distance = (self.distance - delta).clamp(MIN_DISTANCE, MAX_DISTANCE);
        true
    }

    fn cycle_active(&mut self) {
        self.mode = match self.mode {
            CameraMode::FirstPerson if self.third_person_allowed => CameraMode::ThirdPerson,
            CameraMode::ThirdPerson => CameraMode::ThirdPersonFront,
            _ => CameraMode::FirstPerson,
        };
        info!("Camera mode: {:?}", self.mode);
    }
}
