use std::collections::VecDeque;

use plotclock_core::{
    geometry::{lerp, wrap_angle},
    nalgebra,
    ArmState, BoundedBuffer, ForwardKinematics, Geometry, InverseKinematics, JointAngles,
    KinematicsError, Point, RampStep, SpeedProfile,
};

use crate::{consts, Config};

/// How a move ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Both joints are within tolerance of the final waypoint.
    Reached,
    /// The final waypoint was passed before the joints settled.
    Overshoot,
    /// A waypoint exhausted its tick budget, the move was abandoned.
    Stalled,
}

impl std::fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveOutcome::Reached => write!(f, "reached"),
            MoveOutcome::Overshoot => write!(f, "overshoot"),
            MoveOutcome::Stalled => write!(f, "stalled"),
        }
    }
}

/// Summary of a completed move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveReport {
    /// Requested pen position.
    pub target: Point,
    /// How the move ended.
    pub outcome: MoveOutcome,
    /// Number of interpolation waypoints.
    pub waypoints: usize,
    /// Number of ramping ticks over all waypoints.
    pub ticks: usize,
    /// Number of waypoints ended by overshoot.
    pub overshoots: usize,
}

impl std::fmt::Display for MoveReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}) {} after {} ticks over {} waypoints",
            self.target.x, self.target.y, self.outcome, self.ticks, self.waypoints
        )?;

        if self.overshoots > 0 {
            write!(f, " ({} overshoot)", self.overshoots)?;
        }

        Ok(())
    }
}

struct WaypointProgress {
    ticks: usize,
    last_ratio: Option<JointAngles>,
    is_final: bool,
}

/// Planned move towards a target.
///
/// All waypoints are solved up front, a move never contains an unreachable
/// waypoint.
pub struct Move {
    waypoints: VecDeque<(Point, JointAngles)>,
    active: Option<WaypointProgress>,
    report: MoveReport,
}

impl Move {
    #[inline]
    pub fn target(&self) -> Point {
        self.report.target
    }

    /// Number of waypoints in this move.
    #[inline]
    pub fn len(&self) -> usize {
        self.report.waypoints
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.report.waypoints == 0
    }
}

/// Result of a single engine tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    /// Joints moved, the move continues on the next tick.
    Moved,
    /// The move is complete.
    Done(MoveReport),
}

/// Plot clock engine.
///
/// Owns the arm state and the trails. The planner is the only writer, any
/// other party reads the arm through the accessors.
pub struct PlotClock {
    geometry: Geometry,
    profile: SpeedProfile,
    resolution: f64,
    max_ticks: usize,
    ik: InverseKinematics,
    fk: ForwardKinematics,
    state: ArmState,
    pen: Option<Point>,
    targets: BoundedBuffer<Point>,
    pen_trail: BoundedBuffer<Point>,
    target_trail: BoundedBuffer<Point>,
    angle_trail: BoundedBuffer<JointAngles>,
}

impl PlotClock {
    /// Construct the engine from configuration.
    ///
    /// Both servos start at the configured resting angle.
    pub fn new(config: &Config) -> Self {
        let fk = ForwardKinematics::new(config.geometry);

        let initial = JointAngles::new(config.servo.initial_angle, config.servo.initial_angle);

        Self {
            geometry: config.geometry,
            profile: config.servo.profile(),
            resolution: config.motion.resolution,
            max_ticks: config.motion.max_ticks,
            ik: InverseKinematics::new(config.geometry),
            pen: fk.solve(&initial),
            fk,
            state: ArmState::new(initial),
            targets: BoundedBuffer::new(consts::TARGET_BUFFER_SIZE),
            pen_trail: BoundedBuffer::new(config.trail.capacity),
            target_trail: BoundedBuffer::new(config.trail.capacity),
            angle_trail: BoundedBuffer::new(config.trail.capacity),
        }
    }

    /// Wrap the engine for sharing between tasks.
    pub fn into_shared(self) -> crate::SharedPlotClock {
        std::sync::Arc::new(tokio::sync::RwLock::new(self))
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn profile(&self) -> &SpeedProfile {
        &self.profile
    }

    #[inline]
    pub fn state(&self) -> &ArmState {
        &self.state
    }

    /// Last resolved pen position.
    #[inline]
    pub fn pen(&self) -> Option<Point> {
        self.pen
    }

    #[inline]
    pub fn left_servo(&self) -> Point {
        self.geometry.left_servo()
    }

    #[inline]
    pub fn right_servo(&self) -> Point {
        self.geometry.right_servo()
    }

    #[inline]
    pub fn left_joint(&self) -> Point {
        self.fk.left_joint(&self.state.angles)
    }

    #[inline]
    pub fn right_joint(&self) -> Point {
        self.fk.right_joint(&self.state.angles)
    }

    /// Plotted arm points.
    ///
    /// Ordered left servo, left joint, pen, right joint, right servo. When no
    /// pen position was ever resolved the pen is drawn between the joints.
    pub fn arm_segments(&self) -> [Point; 5] {
        let left_joint = self.left_joint();
        let right_joint = self.right_joint();

        let pen = self
            .pen
            .unwrap_or_else(|| nalgebra::center(&left_joint, &right_joint));

        [
            self.left_servo(),
            left_joint,
            pen,
            right_joint,
            self.right_servo(),
        ]
    }

    #[inline]
    pub fn pen_trail(&self) -> &BoundedBuffer<Point> {
        &self.pen_trail
    }

    #[inline]
    pub fn target_trail(&self) -> &BoundedBuffer<Point> {
        &self.target_trail
    }

    #[inline]
    pub fn angle_trail(&self) -> &BoundedBuffer<JointAngles> {
        &self.angle_trail
    }

    /// Last requested target.
    #[inline]
    pub fn last_target(&self) -> Option<&Point> {
        self.targets.latest()
    }

    /// Plan a move towards `target`.
    ///
    /// The segment from the last requested target is divided into equally
    /// spaced waypoints. Fails if the target or any waypoint is unreachable.
    /// The engine is not modified.
    pub fn plan(&self, target: Point) -> Result<Move, KinematicsError> {
        // Bounds the segment length before the waypoint count is derived.
        let target_angles = self.ik.solve(&target)?;

        let waypoints = match self.targets.latest() {
            Some(previous) => {
                let distance = nalgebra::distance(previous, &target);
                let steps = ((self.resolution * distance).floor() as usize).max(1);

                (1..=steps)
                    .map(|i| {
                        let point = lerp(previous, &target, i as f64 / steps as f64);
                        self.ik.solve(&point).map(|angles| (point, angles))
                    })
                    .collect::<Result<VecDeque<_>, _>>()?
            }
            None => VecDeque::from([(target, target_angles)]),
        };

        Ok(Move {
            active: None,
            report: MoveReport {
                target,
                outcome: MoveOutcome::Reached,
                waypoints: waypoints.len(),
                ticks: 0,
                overshoots: 0,
            },
            waypoints,
        })
    }

    /// Accept a planned move as the current target.
    pub fn commit(&mut self, mv: &Move) {
        self.targets.push(mv.target());
    }

    /// Advance the move by one tick.
    ///
    /// Waypoints already within tolerance are passed without consuming a tick.
    pub fn tick(&mut self, mv: &mut Move) -> Tick {
        loop {
            if mv.active.is_none() {
                let Some((point, angles)) = mv.waypoints.pop_front() else {
                    return Tick::Done(mv.report);
                };

                log::trace!("Waypoint ({:.3}, {:.3}) => {}", point.x, point.y, angles);

                self.state = self.state.with_target(angles);
                self.target_trail.push(point);

                mv.active = Some(WaypointProgress {
                    ticks: 0,
                    last_ratio: None,
                    is_final: mv.waypoints.is_empty(),
                });
            }

            let Some(progress) = mv.active.as_mut() else {
                return Tick::Done(mv.report);
            };

            if progress.ticks >= self.max_ticks {
                log::warn!(
                    "Waypoint not reached within {} ticks: {}",
                    self.max_ticks,
                    self.state
                );

                mv.report.outcome = MoveOutcome::Stalled;
                mv.waypoints.clear();
                mv.active = None;
                return Tick::Done(mv.report);
            }

            match self.state.ramp(&self.profile, progress.last_ratio) {
                RampStep::Arrived => {
                    if progress.is_final {
                        mv.report.outcome = MoveOutcome::Reached;
                    }
                    mv.active = None;
                }
                // Unreachable while steps are clamped to the remaining error.
                RampStep::Overshoot => {
                    log::debug!("Overshoot detected: {}", self.state);

                    mv.report.overshoots += 1;
                    if progress.is_final {
                        mv.report.outcome = if self.state.is_within(self.profile.tolerance()) {
                            MoveOutcome::Reached
                        } else {
                            MoveOutcome::Overshoot
                        };
                    }
                    mv.active = None;
                }
                RampStep::Advance { state, ratio } => {
                    progress.ticks += 1;
                    progress.last_ratio = Some(ratio);
                    mv.report.ticks += 1;

                    self.apply(state);

                    return Tick::Moved;
                }
            }
        }
    }

    /// Run a move to completion without suspending.
    pub fn go_to(&mut self, x: f64, y: f64) -> Result<MoveReport, KinematicsError> {
        let mut mv = self.plan(Point::new(x, y))?;
        self.commit(&mv);

        loop {
            if let Tick::Done(report) = self.tick(&mut mv) {
                return Ok(report);
            }
        }
    }

    fn apply(&mut self, state: ArmState) {
        self.state = state;

        match self.fk.solve(&state.angles) {
            Some(pen) => {
                self.pen = Some(pen);
                self.pen_trail.push(pen);
            }
            None => log::trace!("Upper arms do not meet: {}", state.angles),
        }

        self.angle_trail.push(JointAngles::new(
            wrap_angle(state.angles.left),
            wrap_angle(state.angles.right),
        ));
    }
}
