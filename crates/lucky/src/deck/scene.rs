//! The deck plus the per-card animation and pointer state a front-end layers
//! on top of it. Nothing here touches a toolkit; the host hands in the
//! [`Stage`] the pointer coordinates belong to.

use super::host::{Scheduler, Viewport};
use super::model::{CardId, CardSlot, Deck, DeckAction, Phase};
use super::motion::{CardMotion, MotionFrame};
use super::pose::CardFlags;
use super::stage::Stage;
use super::RESET_LABEL;
use cardkit::geom::Point;
use cardkit::prize::{PrizeLabel, PrizePool};
use cardkit::tilt::{Tilt, TiltConfig, TiltPose};
use std::time::Duration;

/// Everything needed to draw one card.
pub struct CardView<'a> {
    pub index: usize,
    pub slot: &'a CardSlot,
    pub frame: MotionFrame,
    pub tilt: TiltPose,
    pub flags: CardFlags,
}

pub struct Scene<S: Scheduler, V: Viewport> {
    pub deck: Deck<S, V>,
    pub title: String,
    motions: Vec<CardMotion>,
    tilts: Vec<Tilt>,
    hovered: Option<usize>,
    reset_hovered: bool,
}

impl<S: Scheduler, V: Viewport> Scene<S, V> {
    pub fn new(deck: Deck<S, V>, title: String) -> Self {
        let mut scene = Self {
            deck,
            title,
            motions: Vec::new(),
            tilts: Vec::new(),
            hovered: None,
            reset_hovered: false,
        };
        scene.sync();
        scene
    }

    /// Runs a deck operation and follows up on its outcome. Returns whether
    /// a redraw is needed.
    pub fn apply(&mut self, op: impl FnOnce(&mut Deck<S, V>) -> DeckAction) -> bool {
        let action = op(&mut self.deck);
        if action.should_redraw {
            self.sync();
        }
        action.should_redraw
    }

    /// Points every card's animation at the pose the deck now wants. Tilt
    /// springs are kept; only their flags change.
    fn sync(&mut self) {
        let count = self.deck.slots().len();
        if self.motions.len() != count {
            self.motions = (0..count)
                .filter_map(|i| self.deck.pose(i))
                .map(CardMotion::new)
                .collect();
            self.tilts = (0..count).map(|_| Tilt::new(TiltConfig::CARD)).collect();
            self.hovered = None;
        }

        for (i, (motion, tilt)) in self.motions.iter_mut().zip(&mut self.tilts).enumerate() {
            if let Some(pose) = self.deck.pose(i) {
                motion.retarget(pose);
            }
            if let Some(flags) = self.deck.flags(i) {
                tilt.set_active(flags.tilt_active);
                tilt.set_scale_disabled(flags.scale_disabled);
            }
        }

        if !self.deck.reset_visible() {
            self.reset_hovered = false;
        }
    }

    /// Deals from a new prize list. An identical list leaves the current
    /// batch, and any prize on display, alone.
    pub fn reload_prizes<P: AsRef<str>>(&mut self, prizes: &[P]) -> bool {
        let unchanged = self
            .deck
            .prizes()
            .iter()
            .map(PrizeLabel::as_str)
            .eq(prizes.iter().map(AsRef::as_ref));
        if unchanged {
            log::debug!("Prize list unchanged, keeping the current batch");
            return false;
        }
        self.apply(|deck| deck.remount(PrizePool::new(prizes)))
    }

    /// Returns `true` while anything is still moving.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let mut moving = false;
        for motion in &mut self.motions {
            moving |= motion.tick(dt);
        }
        for tilt in &mut self.tilts {
            moving |= tilt.tick(dt);
        }
        moving
    }

    pub fn is_at_rest(&self) -> bool {
        self.motions.iter().all(CardMotion::is_at_rest) && self.tilts.iter().all(Tilt::is_at_rest)
    }

    fn frames(&self) -> Vec<MotionFrame> {
        self.motions.iter().map(CardMotion::frame).collect()
    }

    pub fn cards(&self) -> Vec<CardView<'_>> {
        self.deck
            .slots()
            .iter()
            .enumerate()
            .zip(self.motions.iter().zip(&self.tilts))
            .filter_map(|((index, slot), (motion, tilt))| {
                Some(CardView {
                    index,
                    slot,
                    frame: motion.frame(),
                    tilt: tilt.current(),
                    flags: self.deck.flags(index)?,
                })
            })
            .collect()
    }

    pub fn tilt(&self, index: usize) -> Option<&Tilt> {
        self.tilts.get(index)
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn reset_hovered(&self) -> bool {
        self.reset_hovered
    }

    pub fn pointer_move(&mut self, stage: Stage, pointer: Point) -> bool {
        let metrics = self.deck.metrics().clone();
        let frames = self.frames();
        let hit = stage.card_at(&metrics, &frames, pointer, |_| true);

        let mut changed = false;
        if hit != self.hovered {
            if let Some(tilt) = self.hovered.and_then(|i| self.tilts.get_mut(i)) {
                tilt.pointer_leave();
            }
            if let Some(tilt) = hit.and_then(|i| self.tilts.get_mut(i)) {
                tilt.pointer_enter();
            }
            self.hovered = hit;
            changed = true;
        }
        if let Some(i) = hit
            && let Some(tilt) = self.tilts.get_mut(i)
        {
            changed |= tilt.pointer_move(pointer, stage.card_bounds(&metrics, &frames[i]));
        }

        let reset_hovered =
            self.deck.reset_visible() && stage.reset_bounds(&metrics).contains(pointer);
        changed |= reset_hovered != self.reset_hovered;
        self.reset_hovered = reset_hovered;
        changed
    }

    pub fn pointer_leave(&mut self) -> bool {
        let mut changed = self.reset_hovered;
        if let Some(tilt) = self.hovered.take().and_then(|i| self.tilts.get_mut(i)) {
            changed |= tilt.pointer_leave();
        }
        self.reset_hovered = false;
        changed
    }

    /// The reset control takes the click when it is showing; otherwise the
    /// topmost interactive card does.
    pub fn click(&mut self, stage: Stage, pointer: Point) -> bool {
        let metrics = self.deck.metrics().clone();

        if self.deck.reset_visible() && stage.reset_bounds(&metrics).contains(pointer) {
            return self.apply(|deck| deck.reset());
        }

        let frames = self.frames();
        let deck = &self.deck;
        let hit = stage.card_at(&metrics, &frames, pointer, |i| {
            deck.flags(i).is_some_and(|f| f.interactive)
        });
        match hit {
            Some(i) => self.apply(|deck| deck.trigger(CardId::from(i))),
            None => false,
        }
    }

    /// Keyboard activation: spreads the stack, or picks the hovered card.
    pub fn activate(&mut self) -> bool {
        if self.deck.phase() == Phase::Stacked {
            return self.apply(|deck| deck.spread());
        }
        let interactive = self
            .hovered
            .and_then(|i| self.deck.flags(i))
            .is_some_and(|f| f.interactive);
        match self.hovered {
            Some(i) if interactive => self.apply(|deck| deck.trigger(CardId::from(i))),
            _ => false,
        }
    }

    pub fn tooltip(&self) -> Option<&'static str> {
        if self.reset_hovered {
            return Some(RESET_LABEL);
        }
        self.hovered
            .and_then(|i| self.deck.flags(i))
            .filter(|f| f.interactive)
            .map(|f| f.label)
    }
}
