//! A scripted player for headless runs.

use runner_kernel::GameSession;

use crate::event::InputEvent;

/// Fraction of the full airtime to lead the obstacle by. Half puts the apex
/// over the obstacle centre.
const LEAD: f32 = 0.5;

/// Watches the nearest obstacle and jumps so the apex of the arc lines up
/// with it.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    jumps: u32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jumps issued so far.
    pub fn jumps(&self) -> u32 {
        self.jumps
    }

    /// How far ahead an obstacle may be when the jump is issued.
    pub fn trigger_distance(&self, session: &GameSession) -> f32 {
        session.speed() * session.settings().airtime() * LEAD
    }

    /// The input to send this frame, if any. Never starts or restarts runs.
    pub fn decide(&mut self, session: &GameSession) -> Option<InputEvent> {
        if !session.is_running() || session.character().is_airborne() {
            return None;
        }
        let nearest = session.obstacles().nearest_ahead()?;
        let distance = nearest.distance_ahead();
        if distance > self.trigger_distance(session) {
            return None;
        }
        self.jumps += 1;
        tracing::debug!(
            id = nearest.id.0,
            kind = %nearest.kind,
            distance,
            "autopilot jump"
        );
        Some(InputEvent::JumpPressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::dispatch;
    use runner_kernel::{GameEvent, GameSettings, RunPhase};
    use std::time::Duration;

    const FRAME: Duration = Duration::from_nanos(16_666_667);

    #[test]
    fn idle_session_gets_no_input() {
        let s = GameSession::new(GameSettings::default());
        let mut pilot = Autopilot::new();
        assert_eq!(pilot.decide(&s), None);
    }

    #[test]
    fn waits_until_obstacle_is_close() {
        let mut s = GameSession::new(GameSettings::default());
        s.start();
        let mut pilot = Autopilot::new();
        assert_eq!(pilot.decide(&s), None, "nothing spawned yet");

        // First spawn lands after the obstacle interval.
        while s.obstacles().is_empty() {
            s.update(FRAME);
        }
        assert_eq!(pilot.decide(&s), None, "fresh spawn is far away");
        assert_eq!(pilot.jumps(), 0);
    }

    #[test]
    fn trigger_scales_with_speed() {
        let mut slow = GameSession::new(GameSettings::default());
        slow.start();
        let mut fast = GameSession::new(GameSettings {
            base_speed: 24.0,
            ..GameSettings::default()
        });
        fast.start();
        let pilot = Autopilot::new();
        let ratio = pilot.trigger_distance(&fast) / pilot.trigger_distance(&slow);
        assert!((ratio - 2.0).abs() < 1e-4);
    }

    #[test]
    fn clears_obstacles_for_half_a_minute() {
        let mut s = GameSession::with_seed(GameSettings::default(), 7);
        let mut pilot = Autopilot::new();
        dispatch(&mut s, InputEvent::JumpPressed);
        for _ in 0..60 * 30 {
            if let Some(event) = pilot.decide(&s) {
                assert!(dispatch(&mut s, event));
            }
            assert_eq!(s.update(FRAME).phase, RunPhase::Running);
        }
        assert!(s.score() >= 10);
        assert!(pilot.jumps() >= s.score());
        assert!(!s.events().iter().any(|e| matches!(e, GameEvent::Collision { .. })));
    }
}
