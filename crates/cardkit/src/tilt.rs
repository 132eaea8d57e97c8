//! Pointer-driven tilt for a single card.
//!
//! The pointer position inside the card maps to a rotation pair: the top edge
//! tips toward the viewer when the pointer is near it, the right edge when the
//! pointer is to the right. Targets are handed to springs, never snapped.

use crate::geom::{Bounds, Point};
use crate::spring::{Spring, SpringConfig};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltConfig {
    /// Rotation in degrees reached at the card edge.
    pub amplitude: f64,
    pub hover_scale: f64,
    pub spring: SpringConfig,
}

impl TiltConfig {
    /// Cards in the lucky-draw deck.
    pub const CARD: Self = Self {
        amplitude: 10.0,
        hover_scale: 1.05,
        spring: SpringConfig::CARD,
    };

    /// Standalone showcase card: stronger tilt and a larger lift.
    pub const SHOWCASE: Self = Self {
        amplitude: 14.0,
        hover_scale: 1.1,
        spring: SpringConfig::CARD,
    };
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self::CARD
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltPose {
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub scale: f64,
}

impl Default for TiltPose {
    fn default() -> Self {
        Self::REST
    }
}

impl TiltPose {
    pub const REST: Self = Self {
        rotate_x: 0.0,
        rotate_y: 0.0,
        scale: 1.0,
    };
}

/// Rotation pair `(rotate_x, rotate_y)` in degrees for a pointer over `bounds`.
///
/// A degenerate box (zero or negative extent on an axis) yields no rotation
/// on that axis.
pub fn rotation_for(pointer: Point, bounds: Bounds, amplitude: f64) -> (f64, f64) {
    let offset = pointer.offset_from(bounds.center());
    let (half_w, half_h) = (bounds.width / 2.0, bounds.height / 2.0);

    let rotate_x = if half_h > 0.0 {
        (offset.y / half_h) * -amplitude
    } else {
        0.0
    };
    let rotate_y = if half_w > 0.0 {
        (offset.x / half_w) * amplitude
    } else {
        0.0
    };
    (rotate_x, rotate_y)
}

#[derive(Debug, Clone)]
pub struct Tilt {
    config: TiltConfig,
    rotate_x: Spring,
    rotate_y: Spring,
    scale: Spring,
    active: bool,
    scale_disabled: bool,
}

impl Tilt {
    pub fn new(config: TiltConfig) -> Self {
        Self {
            config,
            rotate_x: Spring::new(0.0, config.spring),
            rotate_y: Spring::new(0.0, config.spring),
            scale: Spring::new(1.0, config.spring),
            active: false,
            scale_disabled: false,
        }
    }

    pub fn config(&self) -> TiltConfig {
        self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether pointer moves are honoured. Deactivating keeps the current
    /// targets; only a pointer leave eases the card back.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Disabling drops any hover lift; rotation is left alone.
    pub fn set_scale_disabled(&mut self, disabled: bool) {
        self.scale_disabled = disabled;
        if disabled {
            self.scale.set_target(1.0);
        }
    }

    /// Returns `true` if the targets changed.
    pub fn pointer_move(&mut self, pointer: Point, bounds: Bounds) -> bool {
        if !self.active {
            return false;
        }

        let (rx, ry) = rotation_for(pointer, bounds, self.config.amplitude);
        let before = self.targets();
        self.rotate_x.set_target(rx);
        self.rotate_y.set_target(ry);
        before != self.targets()
    }

    pub fn pointer_enter(&mut self) -> bool {
        if !self.active || self.scale_disabled {
            return false;
        }
        let before = self.scale.target();
        self.scale.set_target(self.config.hover_scale);
        before != self.scale.target()
    }

    /// Eases back to rest regardless of whether the card is active.
    pub fn pointer_leave(&mut self) -> bool {
        let before = self.targets();
        self.rotate_x.set_target(0.0);
        self.rotate_y.set_target(0.0);
        self.scale.set_target(1.0);
        before != self.targets()
    }

    pub fn targets(&self) -> TiltPose {
        TiltPose {
            rotate_x: self.rotate_x.target(),
            rotate_y: self.rotate_y.target(),
            scale: self.scale.target(),
        }
    }

    pub fn current(&self) -> TiltPose {
        TiltPose {
            rotate_x: self.rotate_x.position(),
            rotate_y: self.rotate_y.position(),
            scale: self.scale.position(),
        }
    }

    /// Returns `true` while any of the three springs is still moving.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let x = self.rotate_x.tick(dt);
        let y = self.rotate_y.tick(dt);
        let s = self.scale.tick(dt);
        x || y || s
    }

    pub fn is_at_rest(&self) -> bool {
        self.rotate_x.is_at_rest() && self.rotate_y.is_at_rest() && self.scale.is_at_rest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_bounds() -> Bounds {
        Bounds::new(100.0, 100.0, 200.0, 300.0)
    }

    fn active_tilt() -> Tilt {
        let mut tilt = Tilt::new(TiltConfig::CARD);
        tilt.set_active(true);
        tilt
    }

    #[test]
    fn test_rotation_at_edges() {
        let b = card_bounds();
        assert_eq!(rotation_for(b.center(), b, 10.0), (-0.0, 0.0));
        // top-right corner
        assert_eq!(rotation_for(Point::new(300.0, 100.0), b, 10.0), (10.0, 10.0));
        // bottom-left corner
        assert_eq!(rotation_for(Point::new(100.0, 400.0), b, 10.0), (-10.0, -10.0));
        // halfway to the right edge
        assert_eq!(rotation_for(Point::new(250.0, 250.0), b, 10.0), (-0.0, 5.0));
    }

    #[test]
    fn test_rotation_degenerate_bounds() {
        let flat = Bounds::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(rotation_for(Point::new(5.0, 5.0), flat, 10.0), (0.0, 0.0));
    }

    #[test]
    fn test_pointer_move_sets_targets() {
        let mut tilt = active_tilt();
        assert!(tilt.pointer_move(Point::new(300.0, 250.0), card_bounds()));

        let targets = tilt.targets();
        assert_eq!(targets.rotate_x, -0.0);
        assert_eq!(targets.rotate_y, 10.0);
        // targets are eased, not applied
        assert_eq!(tilt.current().rotate_y, 0.0);
    }

    #[test]
    fn test_inactive_pointer_move_is_ignored() {
        let mut tilt = Tilt::new(TiltConfig::CARD);
        assert!(!tilt.pointer_move(Point::new(300.0, 100.0), card_bounds()));
        assert_eq!(tilt.targets(), TiltPose::REST);
        assert!(!tilt.pointer_enter());
        assert_eq!(tilt.targets().scale, 1.0);
    }

    #[test]
    fn test_enter_scales_unless_disabled() {
        let mut tilt = active_tilt();
        assert!(tilt.pointer_enter());
        assert_eq!(tilt.targets().scale, 1.05);

        let mut revealed = active_tilt();
        revealed.set_scale_disabled(true);
        assert!(!revealed.pointer_enter());
        assert_eq!(revealed.targets().scale, 1.0);

        let mut showcase = Tilt::new(TiltConfig::SHOWCASE);
        showcase.set_active(true);
        showcase.pointer_enter();
        assert_eq!(showcase.targets().scale, 1.1);
    }

    #[test]
    fn test_disabling_scale_drops_hover_lift() {
        let mut tilt = active_tilt();
        tilt.pointer_enter();
        tilt.pointer_move(Point::new(300.0, 100.0), card_bounds());
        tilt.tick(Duration::from_millis(100));
        let before = tilt.current();

        tilt.set_scale_disabled(true);
        assert_eq!(tilt.current(), before);
        let targets = tilt.targets();
        assert_eq!(targets.scale, 1.0);
        assert_eq!((targets.rotate_x, targets.rotate_y), (10.0, 10.0));
    }

    #[test]
    fn test_leave_resets_even_when_inactive() {
        let mut tilt = active_tilt();
        tilt.pointer_enter();
        tilt.pointer_move(Point::new(300.0, 100.0), card_bounds());
        tilt.set_active(false);

        assert!(tilt.pointer_leave());
        assert_eq!(tilt.targets(), TiltPose::REST);
    }

    #[test]
    fn test_tick_eases_toward_targets() {
        let mut tilt = active_tilt();
        tilt.pointer_enter();
        tilt.pointer_move(Point::new(300.0, 100.0), card_bounds());

        assert!(tilt.tick(Duration::from_millis(100)));
        let mid = tilt.current();
        assert!(mid.rotate_y > 0.0 && mid.rotate_y < 10.0);
        assert!(mid.scale > 1.0 && mid.scale < 1.05);

        for _ in 0..300 {
            tilt.tick(Duration::from_millis(16));
        }
        assert!(tilt.is_at_rest());
        assert_eq!(tilt.current(), tilt.targets());
    }

    #[test]
    fn test_siblings_are_independent() {
        let mut a = active_tilt();
        let b = active_tilt();
        a.pointer_move(Point::new(300.0, 100.0), card_bounds());
        assert_ne!(a.targets(), b.targets());
        assert_eq!(b.targets(), TiltPose::REST);
    }
}
