//! Step-indexed animation over a model's precomputed step sequence.
//!
//! [`PlaybackController`] is a pure state machine. Every operation returns a
//! [`Transition`] describing what the caller must do: render the current step,
//! schedule a single-shot tick, cancel the pending one. Ticks carry a
//! [`TickToken`]; a tick whose token is not the pending one is ignored, so a
//! canceled timer that fires anyway has no effect.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

impl TickToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTick {
    pub token: TickToken,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    /// Draw the current step.
    pub render: bool,
    pub schedule: Option<ScheduledTick>,
    pub cancel: Option<TickToken>,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        !self.render && self.schedule.is_none() && self.cancel.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct PlaybackController {
    state: PlaybackState,
    index: u32,
    max_step: u32,
    interval_ms: u32,
    pending: Option<TickToken>,
    issued: u64,
}

impl PlaybackController {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            state: PlaybackState::Idle,
            index: 0,
            max_step: 0,
            interval_ms,
            pending: None,
            issued: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn max_step(&self) -> u32 {
        self.max_step
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn pending(&self) -> Option<TickToken> {
        self.pending
    }

    /// New step sequence after a structural change: back to step 0, idle.
    pub fn reset(&mut self, max_step: u32) -> Transition {
        let cancel = self.pending.take();
        self.max_step = max_step;
        self.index = 0;
        self.state = PlaybackState::Idle;
        tracing::debug!(max_step, "playback reset");
        Transition {
            render: true,
            schedule: None,
            cancel,
        }
    }

    pub fn rewind(&mut self) -> Transition {
        let cancel = self.pending.take();
        self.index = 0;
        self.state = PlaybackState::Idle;
        tracing::debug!("playback rewound");
        Transition {
            render: true,
            schedule: None,
            cancel,
        }
    }

    /// Play/pause button.
    pub fn toggle(&mut self) -> Transition {
        if self.is_playing() {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Start advancing. The first tick fires one interval from now; at the final
    /// step playback restarts from 0. A single-step sequence never plays.
    pub fn play(&mut self) -> Transition {
        if self.is_playing() || self.max_step == 0 {
            return Transition::default();
        }
        let render = if self.index >= self.max_step {
            self.index = 0;
            true
        } else {
            false
        };
        self.state = PlaybackState::Playing;
        tracing::debug!(from = self.index, "playback started");
        Transition {
            render,
            schedule: Some(self.issue()),
            cancel: None,
        }
    }

    pub fn pause(&mut self) -> Transition {
        if !self.is_playing() {
            return Transition::default();
        }
        self.state = PlaybackState::Paused;
        tracing::debug!(at = self.index, "playback paused");
        Transition {
            render: false,
            schedule: None,
            cancel: self.pending.take(),
        }
    }

    /// Timer callback. Stale or unexpected tokens are ignored.
    pub fn tick(&mut self, token: TickToken) -> Transition {
        if !self.is_playing() || self.pending != Some(token) {
            tracing::trace!(token = token.id(), "stale tick ignored");
            return Transition::default();
        }
        self.pending = None;
        self.index = (self.index + 1).min(self.max_step);

        let schedule = if self.index >= self.max_step {
            self.state = PlaybackState::Idle;
            tracing::debug!(at = self.index, "playback finished");
            None
        } else {
            Some(self.issue())
        };
        Transition {
            render: true,
            schedule,
            cancel: None,
        }
    }

    /// Step slider input: pause and jump to `value`, clamped into `[0, max_step]`.
    pub fn scrub(&mut self, value: f64) -> Transition {
        let cancel = self.pending.take();
        self.index = if value.is_nan() {
            0
        } else {
            value.max(0.0).min(self.max_step as f64) as u32
        };
        self.state = PlaybackState::Paused;
        tracing::debug!(to = self.index, "playback scrubbed");
        Transition {
            render: true,
            schedule: None,
            cancel,
        }
    }

    fn issue(&mut self) -> ScheduledTick {
        self.issued += 1;
        let token = TickToken(self.issued);
        self.pending = Some(token);
        ScheduledTick {
            token,
            delay_ms: self.interval_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(max_step: u32) -> PlaybackController {
        let mut p = PlaybackController::new(75);
        p.reset(max_step);
        p
    }

    #[test]
    fn play_schedules_without_advancing() {
        let mut p = ready(3);
        let t = p.play();
        assert!(!t.render);
        let tick = t.schedule.unwrap();
        assert_eq!(tick.delay_ms, 75);
        assert_eq!(p.index(), 0);
        assert_eq!(p.state(), PlaybackState::Playing);
        assert_eq!(p.pending(), Some(tick.token));
    }

    #[test]
    fn ticks_advance_and_auto_stop_at_final_step() {
        let mut p = ready(3);
        let mut token = p.play().schedule.unwrap().token;
        for expected in 1..3 {
            let t = p.tick(token);
            assert!(t.render);
            assert_eq!(p.index(), expected);
            token = t.schedule.unwrap().token;
        }
        let last = p.tick(token);
        assert!(last.render);
        assert!(last.schedule.is_none());
        assert_eq!(p.index(), 3);
        assert_eq!(p.state(), PlaybackState::Idle);
        assert!(p.pending().is_none());
    }

    #[test]
    fn pause_cancels_and_ignores_late_tick() {
        let mut p = ready(5);
        let token = p.play().schedule.unwrap().token;
        let t = p.toggle();
        assert_eq!(t.cancel, Some(token));
        assert_eq!(p.state(), PlaybackState::Paused);

        assert!(p.tick(token).is_noop());
        assert_eq!(p.index(), 0);
    }

    #[test]
    fn resumed_play_uses_fresh_token() {
        let mut p = ready(5);
        let first = p.play().schedule.unwrap().token;
        p.pause();
        let second = p.play().schedule.unwrap().token;
        assert_ne!(first, second);
        assert!(p.tick(first).is_noop());
        assert!(p.tick(second).render);
        assert_eq!(p.index(), 1);
    }

    #[test]
    fn scrub_while_playing_pauses_at_exact_value() {
        let mut p = ready(10);
        let token = p.play().schedule.unwrap().token;
        let t = p.scrub(7.0);
        assert!(t.render);
        assert_eq!(t.cancel, Some(token));
        assert_eq!(p.index(), 7);
        assert_eq!(p.state(), PlaybackState::Paused);
    }

    #[test]
    fn scrub_is_clamped() {
        let mut p = ready(4);
        p.scrub(99.0);
        assert_eq!(p.index(), 4);
        p.scrub(-2.0);
        assert_eq!(p.index(), 0);
        p.scrub(f64::NAN);
        assert_eq!(p.index(), 0);
    }

    #[test]
    fn play_at_final_step_restarts() {
        let mut p = ready(2);
        p.scrub(2.0);
        let t = p.play();
        assert!(t.render);
        assert_eq!(p.index(), 0);
        assert!(p.is_playing());
    }

    #[test]
    fn single_frame_sequence_never_plays() {
        let mut p = ready(0);
        assert!(p.toggle().is_noop());
        assert_eq!(p.state(), PlaybackState::Idle);
    }

    #[test]
    fn rewind_and_reset_cancel_pending() {
        let mut p = ready(4);
        let token = p.play().schedule.unwrap().token;
        p.tick(token);
        let pending = p.pending();
        let t = p.rewind();
        assert_eq!(t.cancel, pending);
        assert_eq!((p.index(), p.state()), (0, PlaybackState::Idle));

        let token = p.play().schedule.unwrap().token;
        let t = p.reset(9);
        assert_eq!(t.cancel, Some(token));
        assert_eq!(p.max_step(), 9);
        assert_eq!(p.index(), 0);
    }
}
