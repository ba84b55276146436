use runner_kernel::GameSession;

/// A discrete input the session understands.
///
/// Every input source (keyboard, autopilot, tests) produces these; the
/// session consumes them, never raw device events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// Start a run if none is in progress, otherwise jump.
    JumpPressed,
    /// Begin ducking. Only honoured during a run.
    DuckPressed,
    /// Stop ducking. Always honoured.
    DuckReleased,
    /// Start a fresh run.
    RestartPressed,
}

impl InputEvent {
    pub fn name(self) -> &'static str {
        match self {
            InputEvent::JumpPressed => "jump",
            InputEvent::DuckPressed => "duck",
            InputEvent::DuckReleased => "duck-release",
            InputEvent::RestartPressed => "restart",
        }
    }
}

/// Deliver `event` to `session`. Returns whether it had any effect; an
/// ignored event is a silent no-op.
pub fn dispatch(session: &mut GameSession, event: InputEvent) -> bool {
    let applied = match event {
        InputEvent::JumpPressed if !session.is_running() => session.start(),
        InputEvent::JumpPressed => session.jump(),
        InputEvent::DuckPressed => session.duck(true),
        InputEvent::DuckReleased => session.duck(false),
        InputEvent::RestartPressed => session.start(),
    };
    if !applied {
        tracing::trace!(event = event.name(), phase = ?session.phase(), "input ignored");
    }
    applied
}
