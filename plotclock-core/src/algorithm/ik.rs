use std::f64::consts::PI;

use crate::{
    geometry::{is_triangle, law_of_cosines},
    Geometry, JointAngles, Point,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KinematicsError {
    /// Target is outside the annulus one of the chains can reach.
    Unreachable { x: f64, y: f64 },
    /// Target coordinates are not finite numbers.
    NonFinite,
}

impl std::fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KinematicsError::Unreachable { x, y } => {
                write!(f, "target ({:.3}, {:.3}) is unreachable", x, y)
            }
            KinematicsError::NonFinite => write!(f, "target is not a finite point"),
        }
    }
}

impl std::error::Error for KinematicsError {}

/// Inverse kinematics for the two-servo linkage.
///
/// Each servo drives its lower arm, the upper arms meet in the pen. A chain
/// is solved as a triangle between servo, lower-arm joint and pen.
pub struct InverseKinematics {
    geometry: Geometry,
}

impl InverseKinematics {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    /// Solve a single chain in its local frame.
    ///
    /// `x` is the horizontal distance from the servo towards the pen. A target
    /// on the vertical through the servo uses the upright polar angle.
    fn chain(&self, x: f64, y: f64) -> Option<f64> {
        // L4 is the leg between the servo and the target.
        let l4 = if x != 0.0 {
            (x.powi(2) + y.powi(2)).sqrt()
        } else {
            y.abs()
        };

        if !is_triangle(l4, self.geometry.lower_arm_length, self.geometry.upper_arm_length) {
            return None;
        }

        let theta_p1 = law_of_cosines(
            l4,
            self.geometry.lower_arm_length,
            self.geometry.upper_arm_length,
        );
        let theta_p2 = if x != 0.0 { (y / x).atan() } else { PI / 2.0 };

        Some(theta_p1 + theta_p2)
    }

    /// Calculate the servo angles placing the pen on `target`.
    ///
    /// Fails with [`KinematicsError::Unreachable`] when either chain cannot
    /// span the distance to the target.
    pub fn solve(&self, target: &Point) -> Result<JointAngles, KinematicsError> {
        if !target.x.is_finite() || !target.y.is_finite() {
            return Err(KinematicsError::NonFinite);
        }

        let unreachable = KinematicsError::Unreachable {
            x: target.x,
            y: target.y,
        };

        let left = self.chain(target.x, target.y).ok_or(unreachable)?;

        // Right chain is mirrored along the x axis.
        let right_x = self.geometry.servo_distance - target.x;
        let right = PI - self.chain(right_x, target.y).ok_or(unreachable)?;

        let angles = JointAngles::new(left, right);
        if !angles.is_finite() {
            return Err(unreachable);
        }

        Ok(angles)
    }
}
