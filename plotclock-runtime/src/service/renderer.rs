use plotclock_core::Point;

use crate::{
    config::RenderConfig,
    runtime::{Service, ServiceContext},
    PlotClock, SharedPlotClock,
};

/// Snapshot of the plot clock for display.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Left servo, left joint, pen, right joint, right servo.
    pub segments: [Point; 5],
    /// Last resolved pen position.
    pub pen: Option<Point>,
    /// Pen trail as separate x and y series.
    pub pen_trail: (Vec<f64>, Vec<f64>),
    /// Waypoint trail as separate x and y series.
    pub target_trail: (Vec<f64>, Vec<f64>),
    /// Servo angles as separate left and right series.
    pub angle_trail: (Vec<f64>, Vec<f64>),
}

impl Frame {
    pub fn capture(clock: &PlotClock) -> Self {
        Self {
            segments: clock.arm_segments(),
            pen: clock.pen(),
            pen_trail: clock.pen_trail().unzip(),
            target_trail: clock.target_trail().unzip(),
            angle_trail: clock.angle_trail().unzip(),
        }
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.pen {
            Some(pen) => write!(f, "Pen: ({:.3}, {:.3})", pen.x, pen.y)?,
            None => write!(f, "Pen: -")?,
        }

        let [_, left, _, right, _] = self.segments;

        write!(
            f,
            "; Joints: ({:.3}, {:.3}) ({:.3}, {:.3}); Trail: {}",
            left.x,
            left.y,
            right.x,
            right.y,
            self.pen_trail.0.len()
        )
    }
}

/// Frame consumer.
pub trait FrameSink: Send {
    fn draw(&mut self, frame: &Frame);
}

/// Write frames to the log.
pub struct LogSink;

impl FrameSink for LogSink {
    fn draw(&mut self, frame: &Frame) {
        log::info!("{}", frame);
    }
}

/// Periodically capture the plot clock and hand it to a sink.
///
/// Frames are only drawn when the arm changed since the last frame.
pub struct Renderer {
    sink: Box<dyn FrameSink>,
    last_frame: Option<Frame>,
    frames: usize,
}

impl Renderer {
    pub fn with_sink(sink: impl FrameSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            last_frame: None,
            frames: 0,
        }
    }

    /// Number of frames drawn.
    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl Service<RenderConfig> for Renderer {
    fn new(_config: RenderConfig) -> Self
    where
        Self: Sized,
    {
        log::debug!("Starting renderer component");

        Self::with_sink(LogSink)
    }

    fn ctx(&self) -> ServiceContext {
        ServiceContext::new("renderer")
    }

    async fn tick(&mut self, clock: SharedPlotClock) {
        let frame = Frame::capture(&*clock.read().await);

        if self.last_frame.as_ref() == Some(&frame) {
            return;
        }

        self.sink.draw(&frame);
        self.frames += 1;
        self.last_frame = Some(frame);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::Config;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<Frame>>>);

    impl FrameSink for Capture {
        fn draw(&mut self, frame: &Frame) {
            self.0.lock().unwrap().push(frame.clone());
        }
    }

    #[test]
    fn test_capture() {
        let mut clock = PlotClock::new(&Config::default());
        clock.go_to(1.0, 2.0).unwrap();

        let frame = Frame::capture(&clock);

        assert_eq!(frame.segments[0], clock.left_servo());
        assert_eq!(frame.segments[4], clock.right_servo());
        assert_eq!(frame.pen, clock.pen());
        assert_eq!(frame.pen_trail.0.len(), clock.pen_trail().len());
        assert_eq!(frame.pen_trail.0.len(), frame.pen_trail.1.len());
        assert_eq!(frame.angle_trail.0.len(), clock.angle_trail().len());
    }

    #[tokio::test]
    async fn test_renderer_skips_unchanged() {
        let capture = Capture::default();
        let mut renderer = Renderer::with_sink(capture.clone());

        let clock = PlotClock::new(&Config::default()).into_shared();

        renderer.tick(clock.clone()).await;
        renderer.tick(clock.clone()).await;
        assert_eq!(renderer.frames(), 1);

        clock.write().await.go_to(1.0, 2.0).unwrap();

        renderer.tick(clock.clone()).await;
        assert_eq!(renderer.frames(), 2);

        let frames = capture.0.lock().unwrap();
        assert!(frames[0].pen_trail.0.is_empty());
        assert!(!frames[1].pen_trail.0.is_empty());
    }
}
