use std::{sync::Arc, time::Duration};

use plotclock_core::Point;
use tokio::sync::RwLock;

use crate::{
    engine::{MoveReport, Tick},
    runtime::Result,
    PlotClock,
};

/// Plot clock shared between the planner and its observers.
pub type SharedPlotClock = Arc<RwLock<PlotClock>>;

/// Asynchronous motion planner.
///
/// Drives the engine one tick at a time and suspends between ticks. The
/// write lock is only held for the duration of a single tick, observers
/// always see the state between two ticks.
#[derive(Clone)]
pub struct MotionPlanner {
    clock: SharedPlotClock,
    tick: Duration,
}

impl MotionPlanner {
    pub fn new(clock: SharedPlotClock, tick: Duration) -> Self {
        Self { clock, tick }
    }

    #[inline]
    pub fn clock(&self) -> &SharedPlotClock {
        &self.clock
    }

    /// Move the pen to `(x, y)`.
    ///
    /// The target is validated before the arm moves. An unreachable target
    /// leaves the engine untouched. Resolves when the move is complete.
    pub async fn go_to(&self, x: f64, y: f64) -> Result<MoveReport> {
        let target = Point::new(x, y);

        let mut mv = {
            let mut clock = self.clock.write().await;

            let mv = clock.plan(target)?;
            clock.commit(&mv);
            mv
        };

        log::debug!(
            "Move to ({:.3}, {:.3}) over {} waypoints",
            target.x,
            target.y,
            mv.len()
        );

        loop {
            let tick = self.clock.write().await.tick(&mut mv);

            match tick {
                Tick::Moved => tokio::time::sleep(self.tick).await,
                Tick::Done(report) => {
                    log::debug!("Move {}", report);
                    return Ok(report);
                }
            }
        }
    }
}
