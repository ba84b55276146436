//! Rendering Adapter: read-only views of a session for whatever draws it.
//!
//! # Invariants
//! - Renderers and score displays cannot mutate the session; they only see
//!   an owned [`RenderFrame`] or a [`runner_kernel::Scoreboard`].
//! - The cosmetic bob is reported separately and never enters collision.
//!
//! A GPU backend would implement [`Renderer`] next to [`DebugTextRenderer`]
//! without changing consumers.

mod frame;
mod renderer;
mod score;

pub use frame::{CharacterView, ObstacleView, RenderFrame};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use score::{ScoreDisplay, ScoreboardWatcher, TextScoreDisplay};
