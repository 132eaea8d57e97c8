//! Placement of the deck inside the window, and what the pointer is over.

use super::motion::MotionFrame;
use cardkit::geom::{Bounds, Point};
use cardkit::metrics::LayoutMetrics;

const TITLE_HEIGHT: f64 = 72.0;
const RESET_MARGIN: f64 = 36.0;
pub const RESET_WIDTH: f64 = 200.0;
pub const RESET_HEIGHT: f64 = 48.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub width: f64,
    pub height: f64,
}

impl Stage {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The card container sits below the title, centred in whatever room
    /// is left once the reset control is accounted for.
    pub fn container_center(&self, metrics: &LayoutMetrics) -> Point {
        let below_title = self.height - TITLE_HEIGHT - RESET_MARGIN - RESET_HEIGHT;
        let y = TITLE_HEIGHT + (below_title / 2.0).max(metrics.container_height / 2.0);
        Point::new(self.width / 2.0, y)
    }

    pub fn container_bounds(&self, metrics: &LayoutMetrics) -> Bounds {
        Bounds::centered(
            self.container_center(metrics),
            metrics.container_max_width.min(self.width),
            metrics.container_height,
        )
    }

    pub fn title_baseline(&self) -> Point {
        Point::new(self.width / 2.0, TITLE_HEIGHT * 0.66)
    }

    pub fn reset_bounds(&self, metrics: &LayoutMetrics) -> Bounds {
        let container = self.container_bounds(metrics);
        let center = Point::new(
            container.center().x,
            container.y + container.height + RESET_MARGIN / 2.0 + RESET_HEIGHT / 2.0,
        );
        Bounds::centered(center, RESET_WIDTH, RESET_HEIGHT)
    }

    /// Unrotated footprint of a card on this frame.
    pub fn card_bounds(&self, metrics: &LayoutMetrics, frame: &MotionFrame) -> Bounds {
        let center = self.container_center(metrics);
        Bounds::centered(
            Point::new(center.x + frame.offset.x, center.y + frame.offset.y),
            metrics.card_width * frame.scale,
            metrics.card_height * frame.scale,
        )
    }

    /// Index of the topmost card under `pointer`, considering only the
    /// cards `eligible` accepts.
    pub fn card_at(
        &self,
        metrics: &LayoutMetrics,
        frames: &[MotionFrame],
        pointer: Point,
        eligible: impl Fn(usize) -> bool,
    ) -> Option<usize> {
        frames
            .iter()
            .enumerate()
            .filter(|(i, _)| eligible(*i))
            .filter(|(_, frame)| self.card_bounds(metrics, frame).contains(pointer))
            .max_by_key(|(i, frame)| (frame.z_index, *i))
            .map(|(i, _)| i)
    }
}
