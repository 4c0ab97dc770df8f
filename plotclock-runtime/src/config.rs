use std::time::Duration;

use plotclock_core::{Geometry, Point, SpeedProfile};
use serde::Deserialize;

use crate::runtime::{Error, Result};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServoConfig {
    /// Maximum servo speed in radians per tick.
    pub max_speed: f64,
    /// Minimum servo speed in radians per tick.
    ///
    /// Derived from the maximum speed if not set.
    pub min_speed: Option<f64>,
    /// Keep a joint moving at minimum speed while the other is ramping.
    pub speed_floor: bool,
    /// Resting angle of both servos on startup.
    pub initial_angle: f64,
}

impl ServoConfig {
    /// Ratio between maximum and derived minimum speed.
    const MIN_SPEED_DIVISOR: f64 = 5.0;

    pub fn min_speed(&self) -> f64 {
        self.min_speed
            .unwrap_or(self.max_speed / Self::MIN_SPEED_DIVISOR)
    }

    pub fn profile(&self) -> SpeedProfile {
        SpeedProfile::new(self.max_speed, self.min_speed(), self.speed_floor)
    }
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            max_speed: 0.05,
            min_speed: None,
            speed_floor: true,
            initial_angle: std::f64::consts::FRAC_PI_2,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TrailConfig {
    /// Number of samples kept per trail.
    pub capacity: usize,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    /// Simulated tick in milliseconds.
    pub tick: u64,
    /// Interpolation steps per unit of length.
    pub resolution: f64,
    /// Tick budget per waypoint before a move is reported stalled.
    pub max_ticks: usize,
    /// Pause between route points in milliseconds.
    pub dwell: u64,
}

impl MotionConfig {
    #[inline]
    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.tick)
    }

    #[inline]
    pub fn dwell_duration(&self) -> Duration {
        Duration::from_millis(self.dwell)
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            tick: 10,
            resolution: 8.0,
            max_ticks: 2_000,
            dwell: 1_000,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Refresh interval in milliseconds.
    pub interval: u64,
}

impl RenderConfig {
    #[inline]
    pub fn interval_duration(&self) -> Duration {
        Duration::from_millis(self.interval.max(1))
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { interval: 100 }
    }
}

/// Plot clock configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Mechanism dimensions.
    pub geometry: Geometry,
    /// Servo configuration.
    pub servo: ServoConfig,
    /// Trail configuration.
    pub trail: TrailConfig,
    /// Motion planner configuration.
    pub motion: MotionConfig,
    /// Renderer configuration.
    pub render: RenderConfig,
    /// Route repeated by the driver.
    pub route: Vec<[f64; 2]>,
}

impl Config {
    /// Route as points in the drawing plane.
    pub fn route_points(&self) -> Vec<Point> {
        self.route.iter().map(|[x, y]| Point::new(*x, *y)).collect()
    }

    /// Check the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result {
        fn positive(name: &str, value: f64) -> Result {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )))
            }
        }

        positive("geometry.upper_arm_length", self.geometry.upper_arm_length)?;
        positive("geometry.lower_arm_length", self.geometry.lower_arm_length)?;
        positive("geometry.servo_distance", self.geometry.servo_distance)?;
        positive("servo.max_speed", self.servo.max_speed)?;
        positive("servo.min_speed", self.servo.min_speed())?;
        positive("motion.resolution", self.motion.resolution)?;

        if !self.servo.initial_angle.is_finite() {
            return Err(Error::InvalidConfig(
                "servo.initial_angle must be finite".to_string(),
            ));
        }
        if self.servo.min_speed() > self.servo.max_speed {
            return Err(Error::InvalidConfig(format!(
                "servo.min_speed {} exceeds servo.max_speed {}",
                self.servo.min_speed(),
                self.servo.max_speed
            )));
        }
        if self.trail.capacity == 0 {
            return Err(Error::InvalidConfig(
                "trail.capacity must be at least 1".to_string(),
            ));
        }
        if self.motion.max_ticks == 0 {
            return Err(Error::InvalidConfig(
                "motion.max_ticks must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            servo: ServoConfig::default(),
            trail: TrailConfig::default(),
            motion: MotionConfig::default(),
            render: RenderConfig::default(),
            route: vec![[0.0, 2.0], [2.0, 2.0], [2.0, 1.75], [0.0, 1.75]],
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}; Servo speed: {:.3}..{:.3} rad/tick; Tick: {}ms; Trail: {}",
            self.geometry,
            self.servo.min_speed(),
            self.servo.max_speed,
            self.motion.tick,
            self.trail.capacity
        )
    }
}
