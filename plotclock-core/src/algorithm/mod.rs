pub use self::fk::ForwardKinematics;
pub use self::ik::{InverseKinematics, KinematicsError};

mod fk;
mod ik;

/// Servo angle pair in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JointAngles {
    /// Left servo angle.
    pub left: f64,
    /// Right servo angle.
    pub right: f64,
}

impl JointAngles {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.right.is_finite()
    }
}

impl std::fmt::Display for JointAngles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "L {:5.2}rad {:6.2}°, R {:5.2}rad {:6.2}°",
            self.left,
            self.left.to_degrees(),
            self.right,
            self.right.to_degrees()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Geometry, Point};

    #[test]
    fn test_round_trip_drawing_area() {
        let geometry = Geometry::default();
        let ik = InverseKinematics::new(geometry);
        let fk = ForwardKinematics::new(geometry);

        let tolerance = 1e-9;

        for i in 0..=8 {
            for j in 0..=6 {
                let target = Point::new(i as f64 * 0.25, 1.5 + j as f64 * 0.25);

                let angles = ik.solve(&target).unwrap();
                let pen = fk.solve(&angles).unwrap();

                assert!(
                    nalgebra::distance(&target, &pen) < tolerance,
                    "round trip failed for {target} => {pen}"
                );
            }
        }
    }

    #[test]
    fn test_round_trip_asymmetric_arms() {
        let geometry = Geometry::new(3.0, 1.5, 1.0);
        let ik = InverseKinematics::new(geometry);
        let fk = ForwardKinematics::new(geometry);

        let target = Point::new(0.4, 3.1);
        let pen = fk.solve(&ik.solve(&target).unwrap()).unwrap();

        assert!(nalgebra::distance(&target, &pen) < 1e-9);
    }
}
