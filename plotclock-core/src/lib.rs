pub mod algorithm;
pub mod buffer;
pub mod geometry;
pub mod motion;

pub use nalgebra;

pub use self::algorithm::{ForwardKinematics, InverseKinematics, JointAngles, KinematicsError};
pub use self::buffer::{BoundedBuffer, Planar};
pub use self::motion::{ArmState, RampStep, SpeedProfile};

/// Planar point in the drawing plane.
///
/// The left servo sits at the origin, the right servo at `(servo_distance, 0)`.
pub type Point = nalgebra::Point2<f64>;

/// Fixed mechanism dimensions.
///
/// These are set once at construction and never change for the lifetime of
/// an engine.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Geometry {
    /// Length of the passive link between the lower-arm joint and the pen.
    pub upper_arm_length: f64,
    /// Length of the actuated link attached to the servo.
    pub lower_arm_length: f64,
    /// Horizontal distance between the two servos.
    pub servo_distance: f64,
}

impl Geometry {
    pub fn new(upper_arm_length: f64, lower_arm_length: f64, servo_distance: f64) -> Self {
        Self {
            upper_arm_length,
            lower_arm_length,
            servo_distance,
        }
    }

    /// Left servo anchor.
    #[inline]
    pub fn left_servo(&self) -> Point {
        Point::origin()
    }

    /// Right servo anchor.
    #[inline]
    pub fn right_servo(&self) -> Point {
        Point::new(self.servo_distance, 0.0)
    }

    /// Inner and outer radius of the annulus a single chain can reach.
    pub fn reach(&self) -> (f64, f64) {
        (
            (self.lower_arm_length - self.upper_arm_length).abs(),
            self.lower_arm_length + self.upper_arm_length,
        )
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            upper_arm_length: 5.0_f64.sqrt(),
            lower_arm_length: 2.0,
            servo_distance: 2.0,
        }
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Upper arm: {:.3}, Lower arm: {:.3}, Servo distance: {:.3}",
            self.upper_arm_length, self.lower_arm_length, self.servo_distance
        )
    }
}
