use std::time::Duration;

use crate::config::ConfigurationError;
use crate::runtime::{ScheduleHandle, Scheduler, SessionEvent};
use crate::session::{Phase, Session, SessionSnapshot, Target};

pub const CLOCK_INTERVAL: Duration = Duration::from_secs(1);
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Owns the session state machine and the timer schedules that drive it.
/// Nothing else in the crate holds mutable session state.
///
/// Every session gets a fresh epoch; tick events carry the epoch they were
/// scheduled under, so a tick that was in flight when the session was reset
/// is discarded instead of mutating the new session.
pub struct SessionController {
    session: Session,
    scheduler: Scheduler,
    epoch: u64,
    clock: Option<ScheduleHandle>,
    sampler: Option<ScheduleHandle>,
}

impl SessionController {
    pub fn new(
        target: Target,
        duration_secs: u64,
        scheduler: Scheduler,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            session: Session::new(target, duration_secs)?,
            scheduler,
            epoch: 0,
            clock: None,
            sampler: None,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Full-value update from the input control. Starts the clock and
    /// sampler on the Idle to Active transition; stops them if the update
    /// finishes a fixed-passage session.
    pub fn handle_input(&mut self, value: &str) {
        let was_idle = self.session.phase == Phase::Idle;
        self.session.accept_input(value);
        if was_idle && self.session.phase == Phase::Active {
            self.start_timers();
        }
        if self.session.has_finished() {
            self.stop_timers();
        }
    }

    pub fn handle_clock_tick(&mut self, epoch: u64) {
        if epoch != self.epoch {
            return;
        }
        self.session.on_clock_tick();
        if self.session.has_finished() {
            self.stop_timers();
        }
    }

    pub fn handle_sampler_tick(&mut self, epoch: u64) {
        if epoch != self.epoch {
            return;
        }
        self.session.on_sampler_tick();
    }

    /// Replaces the session wholesale with a fresh Idle one. Pending
    /// schedules are cancelled and the epoch is bumped so any tick still
    /// queued against the old session is a no-op.
    pub fn reset(&mut self, target: Target, duration_secs: u64) -> Result<(), ConfigurationError> {
        self.stop_timers();
        self.epoch += 1;
        self.session = Session::new(target, duration_secs)?;
        Ok(())
    }

    fn start_timers(&mut self) {
        let epoch = self.epoch;
        self.clock = Some(
            self.scheduler
                .schedule_repeating(CLOCK_INTERVAL, move || SessionEvent::ClockTick(epoch)),
        );
        let epoch = self.epoch;
        self.sampler = Some(
            self.scheduler
                .schedule_repeating(SAMPLE_INTERVAL, move || SessionEvent::SamplerTick(epoch)),
        );
    }

    fn stop_timers(&mut self) {
        if let Some(clock) = self.clock.take() {
            clock.cancel();
        }
        if let Some(sampler) = self.sampler.take() {
            sampler.cancel();
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.stop_timers();
    }
}
