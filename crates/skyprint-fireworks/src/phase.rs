//! Phase sequencing: walks an ordered phase list forward, one boundary per tick

use crate::config::{Phase, PhaseCarryover};

/// Result of advancing the sequencer by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStep {
    /// Phase `index` is active. `entered` is true on the first tick spent in it.
    Active { index: usize, entered: bool },
    /// The last phase ran out on this tick
    Completed,
    /// The sequence had already completed before this tick
    Idle,
}

/// Tracks which phase is active and how long it has been running.
///
/// Transitions only ever move forward by one index. A tick that overshoots a
/// phase ends it; the overshoot is dropped or carried depending on
/// [`PhaseCarryover`], but even carried time never crosses a second
/// boundary in the same tick.
#[derive(Debug, Clone)]
pub struct PhaseSequencer {
    index: usize,
    elapsed: f32,
    complete: bool,
    fresh: bool,
    carryover: PhaseCarryover,
}

impl PhaseSequencer {
    pub fn new(carryover: PhaseCarryover) -> Self {
        Self {
            index: 0,
            elapsed: 0.0,
            complete: false,
            fresh: true,
            carryover,
        }
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Seconds spent in the current phase
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The active phase, or None once complete
    pub fn current<'a>(&self, phases: &'a [Phase]) -> Option<&'a Phase> {
        if self.complete {
            return None;
        }
        phases.get(self.index)
    }

    /// Curve-mapped progress through the active phase; 1.0 once complete
    pub fn progress(&self, phases: &[Phase]) -> f32 {
        self.current(phases)
            .map(|phase| phase.progress(self.elapsed))
            .unwrap_or(1.0)
    }

    /// Advance by `dt` seconds
    pub fn advance(&mut self, phases: &[Phase], dt: f32) -> PhaseStep {
        if self.complete {
            return PhaseStep::Idle;
        }

        let mut entered = std::mem::take(&mut self.fresh);
        self.elapsed += dt.max(0.0);

        if let Some(phase) = phases.get(self.index) {
            if self.elapsed >= phase.duration {
                let residual = self.elapsed - phase.duration;
                self.index += 1;
                self.elapsed = match self.carryover {
                    PhaseCarryover::Drop => 0.0,
                    PhaseCarryover::Carry => residual,
                };
                entered = true;
            }
        }

        if self.index >= phases.len() {
            self.complete = true;
            return PhaseStep::Completed;
        }

        PhaseStep::Active {
            index: self.index,
            entered,
        }
    }
}
