use crate::{geometry::circle_intersections, Geometry, JointAngles, Point};

/// Forward kinematics for the two-servo linkage.
///
/// Both upper arms span a circle around their lower-arm joint. The pen is
/// the intersection of these circles with the greatest y-coordinate.
pub struct ForwardKinematics {
    geometry: Geometry,
}

impl ForwardKinematics {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    /// Far joint of the left lower arm.
    pub fn left_joint(&self, angles: &JointAngles) -> Point {
        Point::new(
            self.geometry.lower_arm_length * angles.left.cos(),
            self.geometry.lower_arm_length * angles.left.sin(),
        )
    }

    /// Far joint of the right lower arm.
    pub fn right_joint(&self, angles: &JointAngles) -> Point {
        Point::new(
            self.geometry.lower_arm_length * angles.right.cos() + self.geometry.servo_distance,
            self.geometry.lower_arm_length * angles.right.sin(),
        )
    }

    /// Resolve the pen position.
    ///
    /// Returns `None` when the upper arms cannot meet for these angles.
    pub fn solve(&self, angles: &JointAngles) -> Option<Point> {
        circle_intersections(
            &self.left_joint(angles),
            self.geometry.upper_arm_length,
            &self.right_joint(angles),
            self.geometry.upper_arm_length,
        )
        .upper()
    }
}
