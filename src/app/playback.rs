// Playback driver
//
// A cancellable repeating timer, polled from the event loop. The driver
// only decides when a step is due; advancing the cursor and redrawing are
// done by the caller, synchronously, before the next poll.

use super::config::{PlaybackConfig, MAX_SPEED, MIN_SPEED, SPEED_FACTOR};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

#[derive(Debug, Clone)]
pub struct Playback {
    state: PlaybackState,
    /// Speed multiplier, clamped to `MIN_SPEED..=MAX_SPEED`
    speed: f64,
    /// When the next step is due; only set while playing
    next_fire: Option<Instant>,
}

impl Playback {
    pub fn new(speed: f64) -> Self {
        Self {
            state: PlaybackState::Stopped,
            speed: clamp_speed(speed),
            next_fire: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn interval(&self) -> Duration {
        PlaybackConfig::tick_interval(self.speed)
    }

    /// Start or stop playback
    ///
    /// Starting is refused when the cursor already sits on the last step.
    pub fn toggle(&mut self, at_end: bool, now: Instant) -> PlaybackState {
        match self.state {
            PlaybackState::Playing => self.stop(),
            PlaybackState::Stopped if at_end => {
                debug!("Playback not started: already at the last step");
            }
            PlaybackState::Stopped => {
                self.state = PlaybackState::Playing;
                self.next_fire = Some(now + self.interval());
            }
        }
        self.state
    }

    /// Cancel the timer. Safe to call in any state.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.next_fire = None;
    }

    /// Whether a step is due at `now`; reschedules the timer when it is
    ///
    /// At most one step fires per poll, so a slow frame never causes a burst
    /// of catch-up steps.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_fire {
            Some(due) if self.is_playing() && now >= due => {
                self.next_fire = Some(now + self.interval());
                true
            }
            _ => false,
        }
    }

    /// Double the speed, up to `MAX_SPEED`
    pub fn faster(&mut self, now: Instant) {
        self.set_speed(self.speed * SPEED_FACTOR, now);
    }

    /// Halve the speed, down to `MIN_SPEED`
    pub fn slower(&mut self, now: Instant) {
        self.set_speed(self.speed / SPEED_FACTOR, now);
    }

    /// A running timer restarts with the new interval from `now`
    fn set_speed(&mut self, speed: f64, now: Instant) {
        self.speed = clamp_speed(speed);
        if self.is_playing() {
            self.next_fire = Some(now + self.interval());
        }
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn clamp_speed(speed: f64) -> f64 {
    if speed.is_finite() {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    } else {
        1.0
    }
}
