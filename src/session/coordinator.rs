//! Process lifecycle and virtual-time control.
//!
//! At most one heuristic runs per session. Starting one bumps the session
//! generation and runs its first step immediately; every later step waits in
//! the [`ResumeScheduler`](crate::engine::ResumeScheduler) until the host
//! advances the clock past it.

use crate::engine::{ResumeToken, SimTime};
use crate::error::{TourError, TourResult};
use crate::heuristics::{
    has_improving_swap, CompletionProcess, HeuristicKind, ProcessStep, StepContext, Termination,
    TourProcess, TwoOptProcess,
};
use crate::session::{ActiveProcess, TourSession};

/// Closed tours need this many distinct points before 2-opt can run.
pub const MIN_TWO_OPT_POINTS: usize = 4;

impl TourSession {
    /// Start nearest-neighbor completion from the current last point.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionNotMet` unless the tour is started, open and idle.
    pub fn start_nearest_neighbor(&mut self) -> TourResult<()> {
        self.require_completable(HeuristicKind::NearestNeighbor)?;
        let delay = self.config.timing.nearest_step();
        self.start(Box::new(CompletionProcess::nearest(delay)))
    }

    /// Start random completion from the current last point.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionNotMet` unless the tour is started, open and idle.
    pub fn start_random(&mut self) -> TourResult<()> {
        self.require_completable(HeuristicKind::Random)?;
        let delay = self.config.timing.random_step();
        self.start(Box::new(CompletionProcess::random(delay)))
    }

    /// Start 2-opt improvement of the closed tour.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionNotMet` whenever
    /// [`can_run_two_opt`](TourSession::can_run_two_opt) is false: a process
    /// is running, the tour is open, it has fewer than four points, or no swap
    /// clears the improvement threshold.
    pub fn start_two_opt(&mut self) -> TourResult<()> {
        self.require_idle(HeuristicKind::TwoOpt)?;
        if !self.tour.is_closed() {
            return Err(Self::reject(HeuristicKind::TwoOpt, "the tour is not closed"));
        }
        if self.tour.distinct_count() < MIN_TWO_OPT_POINTS {
            return Err(Self::reject(
                HeuristicKind::TwoOpt,
                "2-opt needs at least four points",
            ));
        }
        if !has_improving_swap(&self.tour, self.config.improvement_threshold) {
            return Err(Self::reject(HeuristicKind::TwoOpt, "no improving swap"));
        }
        let timing = self.config.timing;
        self.start(Box::new(TwoOptProcess::new(
            self.config.improvement_threshold,
            timing.swap_preview(),
            timing.swap_settle(),
        )))
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> SimTime {
        self.now
    }

    /// When the running process next wakes up, if one is running.
    #[must_use]
    pub fn next_resume_at(&self) -> Option<SimTime> {
        self.scheduler.next_resume_time()
    }

    /// Run every resume due at or before `time`, then move the clock to `time`.
    ///
    /// The clock never moves backwards.
    ///
    /// # Errors
    ///
    /// Propagates a failed step; the process is aborted and the clock stays at
    /// the failed resume.
    pub fn advance_to(&mut self, time: SimTime) -> TourResult<()> {
        while let Some(entry) = self.scheduler.next_before(time) {
            self.now = self.now.max(entry.time);
            self.dispatch(entry.token)?;
        }
        self.now = self.now.max(time);
        Ok(())
    }

    /// Jump the clock to the next resume and run it.
    ///
    /// Returns `false` when nothing was scheduled.
    ///
    /// # Errors
    ///
    /// Propagates a failed step.
    pub fn run_next(&mut self) -> TourResult<bool> {
        let Some(entry) = self.scheduler.next() else {
            return Ok(false);
        };
        self.now = self.now.max(entry.time);
        self.dispatch(entry.token)?;
        Ok(true)
    }

    /// Drive the running process, if any, until it finishes.
    ///
    /// # Errors
    ///
    /// Propagates a failed step.
    pub fn run_until_idle(&mut self) -> TourResult<()> {
        while self.is_running() {
            if !self.run_next()? {
                break;
            }
        }
        Ok(())
    }

    fn require_idle(&self, kind: HeuristicKind) -> TourResult<()> {
        if self.flags.running {
            return Err(Self::reject(kind, "a heuristic is already running"));
        }
        Ok(())
    }

    fn require_completable(&self, kind: HeuristicKind) -> TourResult<()> {
        self.require_idle(kind)?;
        if self.tour.is_empty() {
            return Err(Self::reject(kind, "select a start point first"));
        }
        if self.tour.is_closed() {
            return Err(Self::reject(kind, "the tour is already closed"));
        }
        Ok(())
    }

    fn reject(kind: HeuristicKind, reason: &str) -> TourError {
        log::warn!("cannot start {kind}: {reason}");
        TourError::precondition(reason)
    }

    fn start(&mut self, process: Box<dyn TourProcess>) -> TourResult<()> {
        self.generation += 1;
        let kind = process.kind();
        log::info!(
            "starting {kind} (generation {}) at {}",
            self.generation,
            self.now
        );

        self.flags.running = true;
        self.flags.interrupted = false;
        self.active = Some(ActiveProcess {
            generation: self.generation,
            process,
        });
        self.events.process_started(kind);
        self.step_active()
    }

    /// Resume the process a token belongs to, ignoring stale tokens.
    fn dispatch(&mut self, token: ResumeToken) -> TourResult<()> {
        let current = self.active.as_ref().map(|active| active.generation);
        if current == Some(token.generation) {
            self.step_active()
        } else {
            log::debug!("dropping stale resume for generation {}", token.generation);
            Ok(())
        }
    }

    fn step_active(&mut self) -> TourResult<()> {
        let Some(mut active) = self.active.take() else {
            return Ok(());
        };

        let mut ctx = StepContext::new(
            &mut self.tour,
            &mut self.history,
            &mut self.rng,
            &mut self.events,
            self.flags.interrupted,
        );
        match active.process.resume(&mut ctx) {
            Ok(ProcessStep::Suspend(delay)) => {
                self.scheduler.schedule(
                    self.now + delay,
                    ResumeToken {
                        generation: active.generation,
                    },
                );
                self.active = Some(active);
                Ok(())
            }
            Ok(ProcessStep::Finished(termination)) => {
                self.finish(&active, termination);
                Ok(())
            }
            Err(e) => {
                log::warn!("{} aborted: {e}", active.process.kind());
                self.finish(&active, Termination::Aborted);
                Err(e)
            }
        }
    }

    fn finish(&mut self, active: &ActiveProcess, termination: Termination) {
        let kind = active.process.kind();
        self.scheduler.cancel(active.generation);
        self.flags.running = false;
        self.flags.interrupted = false;
        log::info!(
            "{kind} finished ({termination:?}) at {}, route length {:.1}",
            self.now,
            self.tour.route_length()
        );
        self.events.process_finished(kind, termination);
    }
}
