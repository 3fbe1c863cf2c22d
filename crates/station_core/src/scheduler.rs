//! Fixed-interval timers driven by explicit elapsed time.
//!
//! Nothing here reads a clock. The session advances the scheduler by the
//! time that passed and runs whatever came due, so headless runs and tests
//! replay identically.

use serde::{Deserialize, Serialize};

use crate::config::TaskIntervals;

/// A periodic job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduledTask {
    /// Restore energy.
    RegenerateEnergy,
    /// Run building production.
    ProduceResources,
    /// Recompute the role.
    UpdateRole,
    /// Sweep the mission board.
    CheckMissions,
    /// Move market prices.
    DriftPrices,
}

impl ScheduledTask {
    /// All tasks, in declaration order. Tasks due at the same instant fire
    /// in this order.
    pub const ALL: [Self; 5] = [
        Self::RegenerateEnergy,
        Self::ProduceResources,
        Self::UpdateRole,
        Self::CheckMissions,
        Self::DriftPrices,
    ];

    /// Interval for this task in `intervals`.
    #[must_use]
    pub const fn interval(self, intervals: &TaskIntervals) -> u64 {
        match self {
            Self::RegenerateEnergy => intervals.regenerate_energy_ms,
            Self::ProduceResources => intervals.produce_resources_ms,
            Self::UpdateRole => intervals.update_role_ms,
            Self::CheckMissions => intervals.check_missions_ms,
            Self::DriftPrices => intervals.drift_prices_ms,
        }
    }
}

/// Most firings of one task a single [`Scheduler::advance`] returns.
/// Older firings past this are skipped and the timer keeps its phase.
pub const MAX_FIRINGS_PER_STEP: usize = 100_000;

#[derive(Debug, Clone, Copy)]
struct Timer {
    task: ScheduledTask,
    interval_ms: u64,
    /// `None` once the next firing would fall past the end of the clock.
    next_due_ms: Option<u64>,
}

/// Tracks when each task is next due.
#[derive(Debug, Clone)]
pub struct Scheduler {
    timers: Vec<Timer>,
    now_ms: u64,
}

impl Scheduler {
    /// A scheduler at time zero. Every task first fires one interval in.
    #[must_use]
    pub fn new(intervals: &TaskIntervals) -> Self {
        let timers = ScheduledTask::ALL
            .into_iter()
            .map(|task| {
                let interval_ms = task.interval(intervals);
                Timer {
                    task,
                    interval_ms,
                    next_due_ms: Some(interval_ms),
                }
            })
            .collect();
        Self { timers, now_ms: 0 }
    }

    /// Milliseconds advanced so far.
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Move time forward by `elapsed_ms` and return every firing that came
    /// due, in chronological order.
    ///
    /// A step longer than an interval fires that task once per interval
    /// covered, up to [`MAX_FIRINGS_PER_STEP`]. Disabled (zero-interval)
    /// tasks never fire. Time saturates at `u64::MAX` milliseconds.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<ScheduledTask> {
        let target = self.now_ms.saturating_add(elapsed_ms);
        let mut due: Vec<(u64, usize, ScheduledTask)> = Vec::new();

        for (order, timer) in self.timers.iter_mut().enumerate() {
            if timer.interval_ms == 0 {
                continue;
            }
            let mut fired = 0;
            while let Some(at) = timer.next_due_ms.filter(|at| *at <= target) {
                if fired == MAX_FIRINGS_PER_STEP {
                    let missed = (target - at) / timer.interval_ms + 1;
                    timer.next_due_ms = missed
                        .checked_mul(timer.interval_ms)
                        .and_then(|skip| at.checked_add(skip));
                    tracing::warn!(task = ?timer.task, missed, "Skipped overdue firings");
                    break;
                }
                due.push((at, order, timer.task));
                fired += 1;
                timer.next_due_ms = at.checked_add(timer.interval_ms);
            }
        }

        self.now_ms = target;
        due.sort_unstable_by_key(|&(at, order, _)| (at, order));
        due.into_iter().map(|(_, _, task)| task).collect()
    }

    /// Return to time zero.
    pub fn reset(&mut self) {
        self.now_ms = 0;
        for timer in &mut self.timers {
            timer.next_due_ms = Some(timer.interval_ms);
        }
    }
}
