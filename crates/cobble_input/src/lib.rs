//! First-person input handling for the cobble client.
//!
//! [`InputSession`] owns all input state. Every entry point takes an
//! [`InputContext`] bundling the collaborators the session reads and mutates:
//! the screen stack, world, player, network sink, inventory and so on.

pub mod actions;
pub mod click;
pub mod clock;
pub mod config;
pub mod context;
pub mod events;
pub mod hotkeys;
pub mod keybinds;
pub mod keys;
pub mod options;
pub mod placement;
pub mod routing;
pub mod scroll;
pub mod screen;
pub mod session;

#[cfg(test)]
mod testing;

pub use click::ClickButton;
pub use config::{InputSettings, PlatformQuirks};
pub use context::InputContext;
pub use events::UserEvent;
pub use keys::{InputKey, Modifiers, PressedKeys};
pub use routing::KeyDownStage;
pub use scroll::ScrollTarget;
pub use session::InputSession;
