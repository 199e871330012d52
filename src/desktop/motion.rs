//! Eased pointer motion

use super::types::Point;
use std::time::Duration;

/// Time between intermediate pointer positions
pub const MOTION_STEP: Duration = Duration::from_millis(16);

/// Quadratic ease-in-out: slow start, fast middle, slow finish
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Intermediate positions from `start` to `end`, one per [`MOTION_STEP`]
///
/// Always ends exactly on `end`. A zero duration jumps straight there.
pub fn motion_path(start: Point, end: Point, duration: Duration) -> Vec<Point> {
    let steps = (duration.as_millis() / MOTION_STEP.as_millis()).max(1) as u32;
    let (dx, dy) = ((end.x - start.x) as f64, (end.y - start.y) as f64);

    (1..=steps)
        .map(|i| {
            let eased = ease_in_out_quad(i as f64 / steps as f64);
            Point::new(
                start.x + (dx * eased).round() as i32,
                start.y + (dy * eased).round() as i32,
            )
        })
        .collect()
}
