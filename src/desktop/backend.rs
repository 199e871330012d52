use super::error::{DesktopError, DesktopResult};
use super::motion::{MOTION_STEP, motion_path};
use super::types::{Point, Pointer, ScreenCapture};
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use image::DynamicImage;
use std::time::Duration;
use tokio::time::sleep;
use xcap::Monitor;

/// The real host: primary monitor capture plus system pointer
pub struct DesktopBackend {
    monitor: Monitor,
    origin: Point,
    enigo: Enigo,
}

impl DesktopBackend {
    /// Open the primary monitor (or the first one) and the input system
    pub fn connect() -> DesktopResult<Self> {
        let monitors = Monitor::all()?;
        let primary = monitors
            .iter()
            .position(|m| m.is_primary().unwrap_or(false))
            .unwrap_or(0);
        let monitor = monitors
            .into_iter()
            .nth(primary)
            .ok_or(DesktopError::NoMonitor)?;

        let origin = Point::new(monitor.x()?, monitor.y()?);
        let enigo = Enigo::new(&Settings::default())?;

        log::info!(
            "🖥️ Capturing monitor '{}' {}x{} at {}",
            monitor.name().unwrap_or_default(),
            monitor.width().unwrap_or_default(),
            monitor.height().unwrap_or_default(),
            origin
        );

        Ok(Self {
            monitor,
            origin,
            enigo,
        })
    }

    /// Screenshot coordinates to global pointer coordinates
    fn to_global(&self, point: Point) -> Point {
        Point::new(point.x + self.origin.x, point.y + self.origin.y)
    }
}

impl ScreenCapture for DesktopBackend {
    async fn capture(&mut self) -> DesktopResult<DynamicImage> {
        let frame = self.monitor.capture_image()?;
        log::debug!("📸 Captured {}x{} frame", frame.width(), frame.height());
        Ok(DynamicImage::ImageRgba8(frame))
    }
}

impl Pointer for DesktopBackend {
    async fn move_to(&mut self, target: Point, duration: Duration) -> DesktopResult<()> {
        let target = self.to_global(target);
        let (x, y) = self.enigo.location()?;
        let start = Point::new(x, y);

        for step in motion_path(start, target, duration) {
            self.enigo.move_mouse(step.x, step.y, Coordinate::Abs)?;
            if !duration.is_zero() {
                sleep(MOTION_STEP).await;
            }
        }
        log::debug!("🖱️ Pointer moved {} -> {}", start, target);
        Ok(())
    }

    async fn click(&mut self) -> DesktopResult<()> {
        self.enigo.button(Button::Left, Direction::Click)?;
        Ok(())
    }
}
