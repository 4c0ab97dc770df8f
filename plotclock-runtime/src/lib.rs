// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

/// The `plotclock` library drives a simulated two-servo plot clock.
///
/// The `engine` module owns the arm state and its trails, the `planner`
/// module moves the arm towards a target one tick at a time. Services in the
/// `service` module observe the shared engine or feed it a route.
pub mod engine;
pub mod logger;
pub mod planner;
pub mod runtime;
pub mod service;

mod config;

pub use self::config::*;
pub use self::engine::{MoveOutcome, MoveReport, PlotClock};
pub use self::planner::{MotionPlanner, SharedPlotClock};
pub use self::runtime::Error;

pub use plotclock_core;

/// Plot clock runtime constants.
pub mod consts {
    /// Plot clock runtime version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Default configuration file.
    pub const DEFAULT_CONFIG_PATH: &str = "plotclock.toml";

    /// Number of requested targets kept by the engine.
    ///
    /// The latest target is the start of the next interpolated segment.
    pub const TARGET_BUFFER_SIZE: usize = 2;
}

/// Read configuration from a TOML file.
pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> runtime::Result<Config> {
    let contents = std::fs::read_to_string(path)?;

    Ok(toml::from_str(&contents)?)
}
