use crate::JointAngles;

/// Sign of `value`, zero for zero.
#[inline]
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Servo speed limits.
///
/// Speeds are expressed in radians per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedProfile {
    /// Upper bound on the per-tick angle change.
    max_speed: f64,
    /// Lower bound on the per-tick angle change while outside tolerance.
    min_speed: f64,
    /// Apply the minimum speed floor.
    floor: bool,
}

impl SpeedProfile {
    pub fn new(max_speed: f64, min_speed: f64, floor: bool) -> Self {
        Self {
            max_speed,
            min_speed,
            floor,
        }
    }

    #[inline]
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    #[inline]
    pub fn min_speed(&self) -> f64 {
        self.min_speed
    }

    /// Angular window in which a joint is considered arrived.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.min_speed * 2.0
    }

    /// Per-tick angle change for a normalized `ratio` in [-1, 1].
    ///
    /// The step never exceeds the `remaining` error, so a joint lands on its
    /// target instead of passing it.
    pub fn step(&self, ratio: f64, remaining: f64) -> f64 {
        let mut step = ratio * self.max_speed;
        if self.floor {
            step += sign(ratio) * (1.0 - ratio.abs()) * self.min_speed;
        }

        if step.abs() > remaining.abs() {
            remaining
        } else {
            step
        }
    }
}

/// Result of a single ramp transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RampStep {
    /// Both joints are within tolerance.
    Arrived,
    /// A joint changed direction since the last tick.
    Overshoot,
    /// Joints moved one tick towards the target.
    Advance {
        /// Next arm state.
        state: ArmState,
        /// Normalized error used for this tick.
        ratio: JointAngles,
    },
}

/// Current and desired servo angles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmState {
    /// Current servo angles.
    pub angles: JointAngles,
    /// Servo angles of the move in progress.
    pub target: JointAngles,
}

impl ArmState {
    /// Construct a resting arm state.
    pub fn new(angles: JointAngles) -> Self {
        Self {
            angles,
            target: angles,
        }
    }

    /// Same state, aiming for `target`.
    pub fn with_target(self, target: JointAngles) -> Self {
        Self {
            angles: self.angles,
            target,
        }
    }

    /// Signed angle error per joint.
    pub fn error(&self) -> JointAngles {
        JointAngles::new(
            self.target.left - self.angles.left,
            self.target.right - self.angles.right,
        )
    }

    /// Both joints are strictly within `tolerance` of their target.
    pub fn is_within(&self, tolerance: f64) -> bool {
        let error = self.error();

        error.left.abs() < tolerance && error.right.abs() < tolerance
    }

    /// Advance the arm by one tick.
    ///
    /// Both joints move proportionally to their error, the joint with the
    /// largest error at full speed. If `last_ratio` has a different sign
    /// than the current ratio on either joint the arm has passed its target
    /// and no further step is taken. Since [`SpeedProfile::step`] never
    /// exceeds the remaining error, a ramp started from this state does not
    /// produce [`RampStep::Overshoot`] on its own.
    pub fn ramp(&self, profile: &SpeedProfile, last_ratio: Option<JointAngles>) -> RampStep {
        if self.is_within(profile.tolerance()) {
            return RampStep::Arrived;
        }

        let error = self.error();

        let max_delta = error.left.abs().max(error.right.abs());
        if max_delta == 0.0 {
            return RampStep::Arrived;
        }

        let ratio = JointAngles::new(error.left / max_delta, error.right / max_delta);

        if let Some(last) = last_ratio {
            if last.left * ratio.left < 0.0 || last.right * ratio.right < 0.0 {
                return RampStep::Overshoot;
            }
        }

        let angles = JointAngles::new(
            self.angles.left + profile.step(ratio.left, error.left),
            self.angles.right + profile.step(ratio.right, error.right),
        );

        RampStep::Advance {
            state: Self {
                angles,
                target: self.target,
            },
            ratio,
        }
    }
}

impl std::fmt::Display for ArmState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] => [{}]", self.angles, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(mut state: ArmState, profile: &SpeedProfile) -> (ArmState, usize, Vec<JointAngles>) {
        let mut last_ratio = None;
        let mut deltas = vec![];

        for tick in 0..10_000 {
            match state.ramp(profile, last_ratio) {
                RampStep::Arrived | RampStep::Overshoot => return (state, tick, deltas),
                RampStep::Advance { state: next, ratio } => {
                    deltas.push(JointAngles::new(
                        next.angles.left - state.angles.left,
                        next.angles.right - state.angles.right,
                    ));
                    last_ratio = Some(ratio);
                    state = next;
                }
            }
        }

        panic!("ramp did not terminate");
    }

    #[test]
    fn test_arrived_without_ticks() {
        let profile = SpeedProfile::new(0.05, 0.01, true);
        let state = ArmState::new(JointAngles::new(1.0, 2.0));

        assert_eq!(state.ramp(&profile, None), RampStep::Arrived);
    }

    #[test]
    fn test_ramp_reaches_target() {
        let profile = SpeedProfile::new(0.05, 0.01, true);
        let state = ArmState::new(JointAngles::new(1.0, 2.0))
            .with_target(JointAngles::new(2.0, 1.5));

        let (state, ticks, _) = run(state, &profile);

        assert!(state.is_within(profile.tolerance()));
        // Largest error 1.0 rad at 0.05 rad per tick.
        assert!(ticks >= 19 && ticks <= 21, "ticks: {ticks}");
    }

    #[test]
    fn test_ramp_speed_bounds() {
        let profile = SpeedProfile::new(0.05, 0.01, true);
        let start = ArmState::new(JointAngles::new(0.3, 2.9));
        let state = start.with_target(JointAngles::new(2.1, 2.4));

        let (_, _, deltas) = run(state, &profile);

        let mut angles = start.angles;
        for delta in deltas {
            let error = JointAngles::new(2.1 - angles.left, 2.4 - angles.right);

            assert!(delta.left.abs() <= profile.max_speed() + 1e-12);
            assert!(delta.right.abs() <= profile.max_speed() + 1e-12);

            if error.left.abs() > profile.tolerance() {
                assert!(delta.left.abs() >= profile.min_speed() - 1e-12);
            }
            if error.right.abs() > profile.tolerance() {
                assert!(delta.right.abs() >= profile.min_speed() - 1e-12);
            }

            angles = JointAngles::new(angles.left + delta.left, angles.right + delta.right);
        }
    }

    #[test]
    fn test_ramp_proportional_without_floor() {
        let profile = SpeedProfile::new(0.1, 0.01, false);
        let state = ArmState::new(JointAngles::new(0.0, 0.0))
            .with_target(JointAngles::new(1.0, -0.5));

        match state.ramp(&profile, None) {
            RampStep::Advance { state, ratio } => {
                assert_eq!(ratio, JointAngles::new(1.0, -0.5));
                assert!((state.angles.left - 0.1).abs() < 1e-12);
                assert!((state.angles.right + 0.05).abs() < 1e-12);
            }
            step => panic!("unexpected step {:?}", step),
        }
    }

    #[test]
    fn test_ramp_floor_term() {
        let profile = SpeedProfile::new(0.1, 0.02, true);
        let state = ArmState::new(JointAngles::new(0.0, 0.0))
            .with_target(JointAngles::new(1.0, 0.25));

        match state.ramp(&profile, None) {
            RampStep::Advance { state, .. } => {
                // 0.25 * 0.1 + 0.75 * 0.02
                assert!((state.angles.right - 0.04).abs() < 1e-12);
            }
            step => panic!("unexpected step {:?}", step),
        }
    }

    #[test]
    fn test_ramp_lands_on_target() {
        let profile = SpeedProfile::new(0.5, 0.01, true);
        let state = ArmState::new(JointAngles::new(0.0, 0.0))
            .with_target(JointAngles::new(0.3, 0.0));

        match state.ramp(&profile, None) {
            RampStep::Advance { state, .. } => {
                assert_eq!(state.angles.left, 0.3);
                assert_eq!(state.angles.right, 0.0);
            }
            step => panic!("unexpected step {:?}", step),
        }
    }

    #[test]
    fn test_ramp_overshoot_detected() {
        let profile = SpeedProfile::new(0.05, 0.01, true);
        let state = ArmState::new(JointAngles::new(1.0, 1.0))
            .with_target(JointAngles::new(0.5, 1.0));

        let last_ratio = Some(JointAngles::new(1.0, 0.0));

        assert_eq!(state.ramp(&profile, last_ratio), RampStep::Overshoot);
    }

    #[test]
    fn test_ramp_never_flips() {
        let profile = SpeedProfile::new(0.05, 0.01, true);
        let mut state = ArmState::new(JointAngles::new(2.9, 0.2))
            .with_target(JointAngles::new(0.4, 1.7));
        let mut last_ratio = None;

        loop {
            match state.ramp(&profile, last_ratio) {
                RampStep::Arrived => break,
                RampStep::Overshoot => panic!("clamped ramp flipped direction"),
                RampStep::Advance { state: next, ratio } => {
                    last_ratio = Some(ratio);
                    state = next;
                }
            }
        }

        assert!(state.is_within(profile.tolerance()));
    }

    #[test]
    fn test_tolerance() {
        let profile = SpeedProfile::new(0.05, 0.01, true);

        assert!((profile.tolerance() - 0.02).abs() < 1e-12);
    }
}
