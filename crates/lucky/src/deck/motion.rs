//! Animated movement of each card between the poses the deck asks for.
//!
//! Position, rotation and scale follow springs; the face flip is a fixed
//! length ease so the card is always edge-on halfway through.

use super::FLIP_DURATION;
use super::pose::CardPose;
use cardkit::geom::Point;
use cardkit::spring::{Spring, SpringConfig};
use std::time::Duration;

/// What a card looks like on one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionFrame {
    pub offset: Point,
    pub rotate_deg: f64,
    pub scale: f64,
    pub flip_deg: f64,
    pub z_index: i32,
    pub shadow: &'static str,
}

impl MotionFrame {
    pub fn shows_prize(&self) -> bool {
        let flip = self.flip_deg.rem_euclid(360.0);
        flip > 90.0 && flip < 270.0
    }

    /// Horizontal squash from the flip; 0 when the card is edge-on.
    pub fn flip_scale(&self) -> f64 {
        self.flip_deg.to_radians().cos().abs()
    }
}

#[derive(Debug, Clone, Copy)]
struct Flip {
    from: f64,
    to: f64,
    elapsed: Duration,
}

impl Flip {
    fn settled(at: f64) -> Self {
        Self {
            from: at,
            to: at,
            elapsed: FLIP_DURATION,
        }
    }

    fn value(&self) -> f64 {
        let t = (self.elapsed.as_secs_f64() / FLIP_DURATION.as_secs_f64()).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * ease_in_out(t)
    }

    fn is_done(&self) -> bool {
        self.elapsed >= FLIP_DURATION
    }
}

fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct CardMotion {
    x: Spring,
    y: Spring,
    rotate: Spring,
    scale: Spring,
    flip: Flip,
    target: CardPose,
    /// Pose still waiting out its stagger delay.
    queued: Option<(CardPose, Duration)>,
}

impl CardMotion {
    /// A card already resting at `pose`.
    pub fn new(pose: CardPose) -> Self {
        let spring = |v| Spring::new(v, SpringConfig::LAYOUT);
        Self {
            x: spring(pose.offset.x),
            y: spring(pose.offset.y),
            rotate: spring(pose.rotate_deg),
            scale: spring(pose.scale),
            flip: Flip::settled(pose.flip_deg),
            target: pose,
            queued: None,
        }
    }

    /// The pose this card is heading for, including one still queued.
    pub fn target(&self) -> &CardPose {
        self.queued.as_ref().map_or(&self.target, |(pose, _)| pose)
    }

    /// Heads for `pose` after its delay. Asking again for the pose already
    /// underway does not restart the delay.
    pub fn retarget(&mut self, pose: CardPose) {
        if *self.target() == pose {
            return;
        }
        if pose.delay.is_zero() {
            self.queued = None;
            self.apply(pose);
        } else {
            self.queued = Some((pose, pose.delay));
        }
    }

    fn apply(&mut self, pose: CardPose) {
        self.x.set_target(pose.offset.x);
        self.y.set_target(pose.offset.y);
        self.rotate.set_target(pose.rotate_deg);
        self.scale.set_target(pose.scale);
        if pose.flip_deg != self.flip.to {
            self.flip = Flip {
                from: self.flip.value(),
                to: pose.flip_deg,
                elapsed: Duration::ZERO,
            };
        }
        self.target = pose;
    }

    /// Returns `true` while anything is still changing.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if let Some((pose, remaining)) = self.queued {
            if remaining <= dt {
                self.queued = None;
                self.apply(pose);
            } else {
                self.queued = Some((pose, remaining - dt));
            }
        }

        let mut moving = false;
        for spring in [&mut self.x, &mut self.y, &mut self.rotate, &mut self.scale] {
            moving |= spring.tick(dt);
        }
        if !self.flip.is_done() {
            self.flip.elapsed += dt;
            moving = true;
        }
        moving || self.queued.is_some()
    }

    pub fn is_at_rest(&self) -> bool {
        self.queued.is_none()
            && self.flip.is_done()
            && [&self.x, &self.y, &self.rotate, &self.scale]
                .iter()
                .all(|s| s.is_at_rest())
    }

    /// Layering and shadow switch as soon as a pose is applied; the rest
    /// is interpolated.
    pub fn frame(&self) -> MotionFrame {
        MotionFrame {
            offset: Point::new(self.x.position(), self.y.position()),
            rotate_deg: self.rotate.position(),
            scale: self.scale.position(),
            flip_deg: self.flip.value(),
            z_index: self.target.z_index,
            shadow: self.target.shadow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::pose::card_pose;
    use cardkit::metrics::compute_metrics;

    fn settle(motion: &mut CardMotion) -> Duration {
        let step = Duration::from_millis(16);
        let mut elapsed = Duration::ZERO;
        while motion.tick(step) {
            elapsed += step;
            assert!(elapsed < Duration::from_secs(10), "never settled");
        }
        elapsed
    }

    #[test]
    fn test_new_motion_rests_at_pose() {
        let m = compute_metrics(1024.0);
        let pose = card_pose(&m, 0, true, false);
        let motion = CardMotion::new(pose);
        assert!(motion.is_at_rest());
        assert_eq!(motion.frame().offset, pose.offset);
        assert_eq!(motion.frame().scale, pose.scale);
    }

    #[test]
    fn test_delay_holds_the_card() {
        let m = compute_metrics(1024.0);
        let mut motion = CardMotion::new(card_pose(&m, 2, true, false));
        let spread = card_pose(&m, 2, false, false);
        assert_eq!(spread.delay, Duration::from_millis(240));

        motion.retarget(spread);
        assert!(motion.tick(Duration::from_millis(200)));
        assert_eq!(motion.frame().offset, card_pose(&m, 2, true, false).offset);

        settle(&mut motion);
        let frame = motion.frame();
        assert!((frame.offset.x - spread.offset.x).abs() < 0.01);
        assert!((frame.offset.y - spread.offset.y).abs() < 0.01);
        assert!(motion.is_at_rest());
    }

    #[test]
    fn test_repeated_retarget_keeps_delay_running() {
        let m = compute_metrics(1024.0);
        let mut motion = CardMotion::new(card_pose(&m, 3, true, false));
        let spread = card_pose(&m, 3, false, false);

        motion.retarget(spread);
        motion.tick(Duration::from_millis(300));
        motion.retarget(spread);
        motion.tick(Duration::from_millis(100));
        // 360ms delay has passed, so the card is on its way
        assert_ne!(motion.frame().offset, card_pose(&m, 3, true, false).offset);
    }

    #[test]
    fn test_flip_shows_prize_after_halfway() {
        let m = compute_metrics(1024.0);
        let mut motion = CardMotion::new(card_pose(&m, 0, false, false));
        motion.retarget(card_pose(&m, 0, false, true));

        assert!(!motion.frame().shows_prize());
        assert_eq!(motion.frame().z_index, 20);

        motion.tick(FLIP_DURATION / 4);
        assert!(!motion.frame().shows_prize());
        motion.tick(FLIP_DURATION / 2);
        assert!(motion.frame().shows_prize());

        settle(&mut motion);
        assert_eq!(motion.frame().flip_deg, 180.0);
        assert_eq!(motion.frame().flip_scale(), 1.0);
    }

    #[test]
    fn test_flip_back_starts_from_current_angle() {
        let m = compute_metrics(1024.0);
        let mut motion = CardMotion::new(card_pose(&m, 0, false, false));
        motion.retarget(card_pose(&m, 0, false, true));
        motion.tick(FLIP_DURATION / 2);
        let midway = motion.frame().flip_deg;

        motion.retarget(card_pose(&m, 0, false, false));
        assert_eq!(motion.frame().flip_deg, midway);
        settle(&mut motion);
        assert_eq!(motion.frame().flip_deg, 0.0);
    }

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(0.5), 0.5);
        assert_eq!(ease_in_out(1.0), 1.0);
    }
}
