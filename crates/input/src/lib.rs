//! Input: physical keys mapped to the four discrete events a session accepts.
//!
//! # Invariants
//! - The kernel never sees keys, only [`InputEvent`]s delivered through
//!   [`dispatch`].
//! - Human input and the [`Autopilot`] produce the same events.

mod autopilot;
mod event;
mod keymap;

pub use autopilot::Autopilot;
pub use event::{InputEvent, dispatch};
pub use keymap::{BindingError, Key, KeyMap, KeyPhase};
