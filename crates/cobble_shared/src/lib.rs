pub mod block;
pub mod inventory;
pub mod physics;
pub mod protocol;
