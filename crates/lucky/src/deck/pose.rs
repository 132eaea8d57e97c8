//! Where each card sits and how it reacts, derived from the deck state.

use super::model::{CardSlot, Phase};
use super::{
    REVEALED_SCALE, REVEALED_Z, SELECT_LABEL, SPREAD_DELAY_STEP, SPREAD_LABEL, STACK_DELAY_STEP,
};
use cardkit::geom::Point;
use cardkit::metrics::{LayoutMetrics, SHADOW_REVEALED, SHADOW_SPREAD};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPose {
    /// Card centre relative to the container centre.
    pub offset: Point,
    pub rotate_deg: f64,
    pub scale: f64,
    /// Rotation about the vertical axis; past 90 the prize face shows.
    pub flip_deg: f64,
    pub z_index: i32,
    /// Stagger before this card starts moving to the pose.
    pub delay: Duration,
    pub shadow: &'static str,
}

pub fn card_pose(metrics: &LayoutMetrics, index: usize, stacked: bool, revealed: bool) -> CardPose {
    let flip_deg = if revealed { 180.0 } else { 0.0 };
    let z_index = if revealed {
        REVEALED_Z
    } else {
        index as i32 + 1
    };

    if stacked {
        let pose = metrics.stacked_pose(index);
        CardPose {
            offset: pose.translate(),
            rotate_deg: pose.rotate_deg,
            scale: pose.scale,
            flip_deg,
            z_index,
            delay: STACK_DELAY_STEP * index as u32,
            shadow: pose.shadow,
        }
    } else {
        CardPose {
            offset: metrics.spread_offset(index),
            rotate_deg: 0.0,
            scale: if revealed { REVEALED_SCALE } else { 1.0 },
            flip_deg,
            z_index,
            delay: SPREAD_DELAY_STEP * index as u32,
            shadow: if revealed {
                SHADOW_REVEALED
            } else {
                SHADOW_SPREAD
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardFlags {
    /// Hit-testable and focusable.
    pub interactive: bool,
    pub tilt_active: bool,
    pub scale_disabled: bool,
    pub label: &'static str,
}

pub fn card_flags(phase: Phase, slot: &CardSlot) -> CardFlags {
    let interactive = match phase {
        Phase::Stacked => true,
        Phase::Spread { selected: None } => !slot.revealed,
        _ => false,
    };

    CardFlags {
        interactive,
        tilt_active: !phase.is_stacked() && phase.selected().is_none_or(|id| id == slot.id),
        scale_disabled: slot.revealed,
        label: if phase.is_stacked() {
            SPREAD_LABEL
        } else {
            SELECT_LABEL
        },
    }
}
