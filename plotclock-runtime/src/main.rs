// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use clap::Parser;

use plotclock::{
    runtime::RuntimeContext,
    service::{Renderer, RouteDriver},
    MotionPlanner, PlotClock,
};

#[derive(Parser)]
#[command(author = "Copyright (C) 2024 Laixer Equipment B.V.")]
#[command(version, propagate_version = true)]
#[command(about = "Plot clock simulator", long_about = None)]
struct Args {
    /// Configuration file.
    #[arg(
        short = 'c',
        long = "config",
        alias = "conf",
        default_value = plotclock::consts::DEFAULT_CONFIG_PATH,
        value_name = "FILE"
    )]
    config: std::path::PathBuf,
    /// Number of route cycles, runs until interrupted if not set.
    #[arg(long)]
    cycles: Option<usize>,
    /// Quiet output (no logging).
    #[arg(long)]
    quiet: bool,
    /// Daemonize the service.
    #[arg(short = 'D', long)]
    daemon: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    plotclock::logger::init(
        plotclock::logger::log_level(args.verbose, args.quiet, args.daemon),
        args.daemon,
    )?;

    if args.daemon {
        log::debug!("Running service as daemon");
    }

    let config = if args.config.exists() {
        plotclock::from_file(&args.config)?
    } else {
        log::warn!(
            "Configuration file {} not found, using defaults",
            args.config.display()
        );
        plotclock::Config::default()
    };

    config.validate()?;

    log::trace!("{:#?}", config);
    log::info!("Plot clock {}", plotclock::consts::VERSION);
    log::info!("{}", config);

    let clock = PlotClock::new(&config).into_shared();

    let runtime = RuntimeContext::new();
    runtime.enable_term_shutdown();

    let renderer = runtime.schedule_service::<Renderer, _>(
        config.render.clone(),
        clock.clone(),
        config.render.interval_duration(),
    );

    let planner = MotionPlanner::new(clock, config.motion.tick_duration());
    let driver = RouteDriver::new(
        planner,
        config.route_points(),
        config.motion.dwell_duration(),
    );

    tokio::select! {
        summary = driver.run(args.cycles) => {
            log::info!(
                "Route complete: {} moves, {} rejected, {} stalled",
                summary.moves,
                summary.rejected,
                summary.stalled
            );
            runtime.shutdown();
        }
        _ = runtime.wait_for_shutdown() => {}
    }

    renderer.await?;

    log::debug!("Plot clock stopped");

    Ok(())
}
