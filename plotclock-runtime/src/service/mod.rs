pub use driver::{RouteDriver, RouteSummary};
pub use renderer::{Frame, FrameSink, LogSink, Renderer};

mod driver;
mod renderer;
