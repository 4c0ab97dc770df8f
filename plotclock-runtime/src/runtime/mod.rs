use std::{future::Future, time::Duration};

use tokio::sync::broadcast;

use crate::SharedPlotClock;

mod error;

pub use self::error::Error;

pub type Result<T = ()> = std::result::Result<T, error::Error>;

/// Service context.
///
/// Describes a service to the runtime.
pub struct ServiceContext {
    /// Service name.
    name: String,
}

impl ServiceContext {
    pub fn new(name: impl ToString) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

pub trait Service<Cnf> {
    /// Construct a new service.
    ///
    /// This method will be called once on startup.
    fn new(config: Cnf) -> Self
    where
        Self: Sized;

    /// Service context.
    fn ctx(&self) -> ServiceContext;

    /// Tick the service.
    ///
    /// This method will be called on each interval of the service. The
    /// service must not hold a lock on the plot clock across suspension
    /// points.
    fn tick(&mut self, clock: SharedPlotClock) -> impl Future<Output = ()> + Send;
}

pub struct RuntimeContext {
    /// Runtime event bus.
    shutdown: (broadcast::Sender<()>, broadcast::Receiver<()>),
}

impl RuntimeContext {
    pub fn new() -> Self {
        Self {
            shutdown: broadcast::channel(1),
        }
    }

    /// Listen for shutdown signal.
    pub fn shutdown_signal(&self) -> broadcast::Receiver<()> {
        self.shutdown.0.subscribe()
    }

    /// Request all background tasks to stop.
    pub fn shutdown(&self) {
        if self.shutdown.0.send(()).is_err() {
            log::trace!("No task listening for shutdown");
        }
    }

    /// Shutdown the runtime on termination request.
    pub fn enable_term_shutdown(&self) {
        log::debug!("Enable signals shutdown");

        let sender = self.shutdown.0.clone();

        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for termination: {}", e);
                return;
            }

            log::info!("Termination requested");

            sender.send(()).ok();
        });
    }

    /// Spawn an asynchronous task in the background.
    ///
    /// The task will be terminated when the runtime is shutdown or when the
    /// shutdown signal is received.
    pub fn spawn_background_task<T>(&self, task: T) -> tokio::task::JoinHandle<()>
    where
        T: Future<Output = ()> + Send + 'static,
    {
        let mut shutdown = self.shutdown_signal();

        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.recv() => {
                    log::debug!("Shutting down background task");
                }
                _ = task => {}
            }
        })
    }

    /// Schedule a service to tick at a fixed interval.
    pub fn schedule_service<S, Cnf>(
        &self,
        config: Cnf,
        clock: SharedPlotClock,
        duration: Duration,
    ) -> tokio::task::JoinHandle<()>
    where
        S: Service<Cnf> + Send + 'static,
    {
        let mut service = S::new(config);

        log::debug!(
            "Schedule {} service on {}ms interval",
            service.ctx().name(),
            duration.as_millis()
        );

        self.spawn_background_task(async move {
            let mut interval = tokio::time::interval(duration);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                service.tick(clock.clone()).await;
            }
        })
    }

    /// Wait for the runtime to shutdown.
    ///
    /// This method will block until the runtime is shutdown.
    pub async fn wait_for_shutdown(&self) {
        let mut shutdown = self.shutdown_signal();

        shutdown.recv().await.ok();
    }
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self::new()
    }
}
