//! Viewport-driven card geometry.
//!
//! Everything here is a pure function of the viewport width: the same width
//! always yields bit-identical metrics, so callers recompute on every resize
//! instead of caching.

use crate::geom::Point;
use serde::Serialize;

/// Width assumed when no viewport is available yet.
pub const INITIAL_VIEWPORT_WIDTH: f64 = 1024.0;
pub const STACK_DEPTH: usize = 4;
pub const CARD_ASPECT: f64 = 1.34;

const CONTAINER_PADDING: f64 = 32.0;
const CONTAINER_VERTICAL_PADDING: f64 = 48.0;
const VIEWPORT_MARGIN: f64 = 16.0; // kept free on each side of the container
const WRAPPER_SLACK: f64 = 72.0;

const SHADOW_BACK: &str = "0 28px 60px -32px rgba(76, 180, 255, 0.65)";
const SHADOW_MIDDLE: &str = "0 28px 60px -32px rgba(157, 115, 255, 0.55)";
const SHADOW_FRONT: &str = "0 32px 68px -34px rgba(255, 89, 173, 0.45)";
const SHADOW_TOP: &str = "0 40px 120px -45px rgba(255, 215, 64, 0.85)";
pub const SHADOW_SPREAD: &str = "0 28px 64px -42px rgba(58, 170, 255, 0.55)";
pub const SHADOW_REVEALED: &str = "0 45px 120px -50px rgba(255, 196, 58, 0.75)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Breakpoint {
    Compact,
    Small,
    Medium,
    Wide,
}

impl Breakpoint {
    /// Lower bounds are inclusive: 360 is compact, 361 is small.
    pub fn for_width(width: f64) -> Self {
        if width <= 360.0 {
            Self::Compact
        } else if width <= 480.0 {
            Self::Small
        } else if width <= 768.0 {
            Self::Medium
        } else {
            Self::Wide
        }
    }

    pub fn card_width(self) -> f64 {
        match self {
            Self::Compact => 138.0,
            Self::Small => 168.0,
            Self::Medium => 208.0,
            Self::Wide => 240.0,
        }
    }

    pub fn gap(self) -> f64 {
        match self {
            Self::Compact => 14.0,
            Self::Small => 18.0,
            Self::Medium => 22.0,
            Self::Wide => 24.0,
        }
    }
}

/// Pose of one card while the deck is stacked. The shadow is an opaque
/// CSS-style descriptor; see [`crate::shadow::BoxShadow`] to interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StackedPose {
    pub translate_x: f64,
    pub translate_y: f64,
    pub rotate_deg: f64,
    pub scale: f64,
    pub shadow: &'static str,
}

impl StackedPose {
    pub fn translate(&self) -> Point {
        Point::new(self.translate_x, self.translate_y)
    }

    pub fn is_identity(&self) -> bool {
        self.translate_x == 0.0
            && self.translate_y == 0.0
            && self.rotate_deg == 0.0
            && self.scale == 1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutMetrics {
    pub breakpoint: Breakpoint,
    pub card_width: f64,
    pub card_height: f64,
    pub gap: f64,
    pub container_max_width: f64,
    pub container_height: f64,
    pub wrapper_max_width: f64,
    /// Index 3 is the topmost card and always the identity pose.
    pub stacked_poses: [StackedPose; STACK_DEPTH],
}

/// Derives the deck geometry for a viewport width.
///
/// Non-finite widths (NaN, ±Infinity) are treated as [`INITIAL_VIEWPORT_WIDTH`].
/// Zero and negative widths fall into the compact breakpoint and may produce
/// a negative `container_max_width`; clamp before using it as a render width.
pub fn compute_metrics(viewport_width: f64) -> LayoutMetrics {
    let width = if viewport_width.is_finite() {
        viewport_width
    } else {
        INITIAL_VIEWPORT_WIDTH
    };

    let breakpoint = Breakpoint::for_width(width);
    let card_width = breakpoint.card_width();
    let gap = breakpoint.gap();
    let card_height = (card_width * CARD_ASPECT).round();

    let container_max_width =
        (width - VIEWPORT_MARGIN).min(card_width * 2.0 + gap + CONTAINER_PADDING);
    let container_height = card_height * 2.0 + gap + CONTAINER_VERTICAL_PADDING;
    let wrapper_max_width = width.min(container_max_width + WRAPPER_SLACK);

    LayoutMetrics {
        breakpoint,
        card_width,
        card_height,
        gap,
        container_max_width,
        container_height,
        wrapper_max_width,
        stacked_poses: stacked_poses(card_width, card_height),
    }
}

fn stacked_poses(w: f64, h: f64) -> [StackedPose; STACK_DEPTH] {
    [
        StackedPose {
            translate_x: -w * 0.15,
            translate_y: h * 0.18,
            rotate_deg: -12.0,
            scale: 0.92,
            shadow: SHADOW_BACK,
        },
        StackedPose {
            translate_x: w * 0.15,
            translate_y: h * 0.16,
            rotate_deg: 10.0,
            scale: 0.94,
            shadow: SHADOW_MIDDLE,
        },
        StackedPose {
            translate_x: 0.0,
            translate_y: h * 0.22,
            rotate_deg: 6.0,
            scale: 0.96,
            shadow: SHADOW_FRONT,
        },
        StackedPose {
            translate_x: 0.0,
            translate_y: 0.0,
            rotate_deg: 0.0,
            scale: 1.0,
            shadow: SHADOW_TOP,
        },
    ]
}

impl LayoutMetrics {
    /// Stacked pose for a slot; slots beyond the stack depth reuse the top pose.
    pub fn stacked_pose(&self, index: usize) -> &StackedPose {
        self.stacked_poses
            .get(index)
            .unwrap_or(&self.stacked_poses[STACK_DEPTH - 1])
    }

    /// Width of the 2x2 spread grid.
    pub fn grid_width(&self) -> f64 {
        self.card_width * 2.0 + self.gap
    }

    pub fn grid_height(&self) -> f64 {
        self.card_height * 2.0 + self.gap
    }

    /// Offset of a slot's centre from the container centre once spread.
    pub fn spread_offset(&self, index: usize) -> Point {
        let (row, col) = ((index / 2) as f64, (index % 2) as f64);
        let x = col * (self.card_width + self.gap) + self.card_width / 2.0 - self.grid_width() / 2.0;
        let y =
            row * (self.card_height + self.gap) + self.card_height / 2.0 - self.grid_height() / 2.0;
        Point::new(x, y)
    }

    pub fn style(&self) -> CardStyle {
        CardStyle::from_metrics(self)
    }
}

/// Secondary dimensions used to draw a card, all scaled from the card size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardStyle {
    pub border_radius: f64,
    pub border_width: f64,
    pub emblem_outer: f64,
    pub emblem_inner: f64,
    pub back_emblem: f64,
    pub back_logo: f64,
    pub vertical_padding: f64,
    pub horizontal_padding: f64,
    pub content_gap: f64,
    pub prize_font_size: f64,
}

impl CardStyle {
    pub fn from_metrics(m: &LayoutMetrics) -> Self {
        let (w, h) = (m.card_width, m.card_height);
        Self {
            border_radius: (w * 0.18).round().clamp(16.0, 32.0),
            border_width: (w * 0.018).round().max(2.0),
            emblem_outer: (w * 0.44).round().clamp(48.0, 118.0),
            emblem_inner: (w * 0.34).round().clamp(36.0, 96.0),
            back_emblem: (w * 0.38).round().clamp(44.0, 108.0),
            back_logo: (w * 0.32).round().clamp(34.0, 92.0),
            vertical_padding: (h * 0.14).round().clamp(18.0, 56.0),
            horizontal_padding: (w * 0.16).round().clamp(18.0, 64.0),
            content_gap: (h * 0.1).round().clamp(12.0, 36.0),
            prize_font_size: (w * 0.16).clamp(16.0, 24.0),
        }
    }

    /// Font size the prize label is actually drawn at.
    pub fn label_font_size(&self) -> f64 {
        (self.prize_font_size - 2.0).min(18.0)
    }
}
