use bitflags::bitflags;
use glam::{IVec3, Vec3};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::block::BlockId;
use crate::physics::{Face, SelectedPos};

pub const PROTOCOL_VERSION: u32 = 1;

bitflags! {
    /// Movement and camera features the server lets the player use.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct HackFlags: u8 {
        const ENABLED          = 0b0000_0001;
        const NOCLIP           = 0b0000_0010;
        const THIRD_PERSON     = 0b0000_0100;
        const CAN_PUSHBACK     = 0b0000_1000;
        const PUSHBACK_PLACING = 0b0001_0000;
    }
}

impl HackFlags {
    pub fn noclip(self) -> bool {
        self.contains(Self::NOCLIP)
    }

    pub fn third_person_allowed(self) -> bool {
        self.contains(Self::ENABLED | Self::THIRD_PERSON)
    }

    pub fn pushback_placing(self) -> bool {
        self.contains(Self::ENABLED | Self::CAN_PUSHBACK | Self::PUSHBACK_PLACING)
    }
}

/// Face id used on the wire; `u8::MAX` marks "nothing selected".
pub fn face_wire_id(face: Face) -> u8 {
    match face {
        Face::NegX => 0,
        Face::PosX => 1,
        Face::NegZ => 2,
        Face::PosZ => 3,
        Face::NegY => 4,
        Face::PosY => 5,
    }
}

/// Packs an angle in degrees into the signed 16 bit range used by click packets.
pub fn angle_to_wire(degrees: f32) -> i16 {
    let scaled = (degrees.rem_euclid(360.0) * 65536.0 / 360.0) as i32;
    scaled as u16 as i16
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum C2S {
    Handshake {
        protocol_version: u32,
        username: String,
    },
    BlockEdit {
        world_pos: IVec3,
        new_block: BlockId,
    },
    PlayerClick {
        button: u8,
        released: bool,
        yaw: i16,
        pitch: i16,
        target_entity: u8,
        target_block: IVec3,
        target_face: u8,
    },
    Chat {
        message: String,
    },
    Disconnect,
}

impl C2S {
    pub fn player_click(
        button: u8,
        pressed: bool,
        heading: f32,
        pitch: f32,
        target_entity: u8,
        selection: &SelectedPos,
    ) -> Self {
        let (target_block, target_face) = if selection.valid {
            (selection.block_pos, face_wire_id(selection.closest))
        } else {
            (IVec3::splat(-1), u8::MAX)
        };

        C2S::PlayerClick {
            button,
            released: !pressed,
            yaw: angle_to_wire(heading),
            pitch: angle_to_wire(pitch),
            target_entity,
            target_block,
            target_face,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum S2C {
    HandshakeAccept {
        player_id: u64,
        world_size: IVec3,
        supports_player_click: bool,
    },
    HandshakeReject {
        reason: String,
    },
    BlockChange {
        world_pos: IVec3,
        block: BlockId,
    },
    HackPermissions {
        hacks: HackFlags,
    },
    HeldBlockLock {
        locked: bool,
    },
    /// Spawns or moves another player; `position` is their feet.
    EntityUpdate {
        id: u8,
        position: Vec3,
    },
    EntityRemove {
        id: u8,
    },
    Chat {
        sender_name: String,
        message: String,
    },
}

pub fn encode<T: Serialize>(msg: &T) -> Vec<u8> {
    bincode::serialize(msg).expect("failed to encode protocol payload")
}

pub fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, bincode::Error> {
    bincode::deserialize(data)
}

#[cfg(test)]
mod tests {
    use glam::{IVec3, Vec3};

    use super::{angle_to_wire, decode, encode, HackFlags, C2S};
    use crate::physics::{Face, SelectedPos};

    #[test]
    fn player_click_survives_the_wire() {
        let selection = SelectedPos::new(IVec3::new(5, 10, 5), Face::PosY, Vec3::new(5.5, 11.0, 5.5));
        let msg = C2S::player_click(1, true, 90.0, 0.0, 3, &selection);

        let bytes = encode(&msg);
        let decoded: C2S = decode(&bytes).expect("decode C2S player click");
        assert_eq!(decoded, msg);

        let C2S::PlayerClick {
            released,
            target_block,
            target_face,
            ..
        } = decoded
        else {
            panic!("expected a player click");
        };
        assert!(!released);
        assert_eq!(target_block, IVec3::new(5, 10, 5));
        assert_eq!(target_face, 5);
    }

    #[test]
    fn invalid_selection_is_sent_as_sentinels() {
        let msg = C2S::player_click(0, false, 0.0, 0.0, 255, &SelectedPos::invalid());
        let C2S::PlayerClick {
            released,
            target_block,
            target_face,
            ..
        } = msg
        else {
            panic!("expected a player click");
        };
        assert!(released);
        assert_eq!(target_block, IVec3::splat(-1));
        assert_eq!(target_face, u8::MAX);
    }

    #[test]
    fn angles_wrap_into_signed_range() {
        assert_eq!(angle_to_wire(0.0), 0);
        assert_eq!(angle_to_wire(90.0), 16384);
        assert_eq!(angle_to_wire(180.0), i16::MIN);
        assert_eq!(angle_to_wire(-90.0), -16384);
    }

    #[test]
    fn hack_capabilities_need_the_master_switch() {
        let mut hacks = HackFlags::THIRD_PERSON | HackFlags::CAN_PUSHBACK | HackFlags::PUSHBACK_PLACING;
        assert!(!hacks.third_person_allowed());
        assert!(!hacks.pushback_placing());

        hacks |= HackFlags::ENABLED;
        assert!(hacks.third_person_allowed());
        assert!(hacks.pushback_placing());

        hacks.remove(HackFlags::PUSHBACK_PLACING);
        assert!(!hacks.pushback_placing());
    }
}
