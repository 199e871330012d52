//! Locate a template in the last screenshot and click inside it

use super::error::AutomationResult;
use super::types::{ClickAttempt, ClickOffset};
use crate::desktop::{Point, Pointer};
use crate::template_matching::{Region, match_template};
use std::path::Path;
use std::time::Duration;

/// Click position for `offset` inside `region`, truncated to whole pixels
pub fn click_point(region: Region, offset: ClickOffset) -> Point {
    let dx = (region.width as f64 * offset.x) as i32;
    let dy = (region.height as f64 * offset.y) as i32;
    Point::new(region.x as i32 + dx, region.y as i32 + dy)
}

/// Match `template` against the screenshot at `screen` and click it when the
/// confidence reaches `threshold`.
///
/// Below the threshold the pointer is left alone.
pub async fn locate_and_click<P: Pointer>(
    pointer: &mut P,
    screen: &Path,
    template: &Path,
    scales: &[f32],
    offset: ClickOffset,
    threshold: f32,
    motion: Duration,
) -> AutomationResult<ClickAttempt> {
    let found = match_template(screen, template, scales)?;

    if !found.is_confident(threshold) {
        log::info!(
            "No match clicked for {}. Highest confidence: {:.2}",
            template.display(),
            found.confidence
        );
        return Ok(ClickAttempt::Missed {
            confidence: found.confidence,
        });
    }

    let at = click_point(found.region, offset);
    pointer.move_to(at, motion).await?;
    pointer.click().await?;
    log::info!(
        "🎯 Clicked at {} with confidence {:.2}.",
        at,
        found.confidence
    );

    Ok(ClickAttempt::Clicked {
        at,
        confidence: found.confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_point_example() {
        let region = Region::new(100, 200, 50, 30);
        assert_eq!(
            click_point(region, ClickOffset::new(0.75, 0.5)),
            Point::new(137, 215)
        );
    }

    #[test]
    fn test_click_point_truncates() {
        let region = Region::new(0, 0, 20, 16);
        // 18.0 and 14.72
        assert_eq!(
            click_point(region, ClickOffset::new(0.9, 0.92)),
            Point::new(18, 14)
        );
    }

    #[test]
    fn test_click_point_corners() {
        let region = Region::new(10, 20, 40, 30);
        assert_eq!(click_point(region, ClickOffset::default()), Point::new(10, 20));
        assert_eq!(click_point(region, ClickOffset::CENTER), Point::new(30, 35));
        assert_eq!(click_point(region, ClickOffset::new(1.0, 1.0)), Point::new(50, 50));
    }
}
