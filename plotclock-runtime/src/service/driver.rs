use std::time::Duration;

use plotclock_core::Point;

use crate::{engine::MoveOutcome, planner::MotionPlanner};

/// Walk the pen along a fixed route.
pub struct RouteDriver {
    planner: MotionPlanner,
    route: Vec<Point>,
    dwell: Duration,
}

/// Totals over a driver run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteSummary {
    pub moves: usize,
    pub rejected: usize,
    pub stalled: usize,
}

impl RouteDriver {
    pub fn new(planner: MotionPlanner, route: Vec<Point>, dwell: Duration) -> Self {
        Self {
            planner,
            route,
            dwell,
        }
    }

    /// Run the route for `cycles` rounds, or forever if not set.
    ///
    /// Unreachable points are skipped with a warning, the remainder of the
    /// route continues from the last accepted target.
    pub async fn run(&self, cycles: Option<usize>) -> RouteSummary {
        let mut summary = RouteSummary::default();

        if self.route.is_empty() {
            log::warn!("Route is empty, nothing to draw");
            return summary;
        }

        let mut cycle = 0;
        while cycles.map_or(true, |cycles| cycle < cycles) {
            log::debug!("Starting route cycle {}", cycle + 1);

            for point in &self.route {
                match self.planner.go_to(point.x, point.y).await {
                    Ok(report) => {
                        summary.moves += 1;
                        if report.outcome == MoveOutcome::Stalled {
                            summary.stalled += 1;
                            log::warn!("Move {}", report);
                        } else {
                            log::info!("Move {}", report);
                        }
                    }
                    Err(e) => {
                        summary.rejected += 1;
                        log::warn!("Skipping route point: {}", e);
                    }
                }

                tokio::time::sleep(self.dwell).await;
            }

            cycle += 1;
        }

        summary
    }
}
