use super::host::{Scheduler, SubscriptionId, TimerId, Viewport};
use super::pose::{self, CardFlags, CardPose};
use super::{RESET_DURATION, SPREAD_DURATION};
use cardkit::metrics::{LayoutMetrics, compute_metrics};
use cardkit::prize::{PrizeLabel, PrizePool};
use derive_more::{Display, From, Into};
use std::time::Duration;

/// Position of a card within the current batch, not tied to its prize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct CardId(usize);

impl CardId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSlot {
    pub id: CardId,
    pub prize: PrizeLabel,
    /// Whether the prize face is showing.
    pub revealed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Phase {
    Stacked,
    /// Cards are fanning out; selection opens once the spread settles.
    Spreading,
    Spread {
        selected: Option<CardId>,
    },
    /// The revealed card is flipping back; a fresh batch follows.
    Resetting,
}

impl Phase {
    pub fn selected(&self) -> Option<CardId> {
        match self {
            Phase::Spread { selected } => *selected,
            _ => None,
        }
    }

    pub fn is_stacked(&self) -> bool {
        matches!(self, Phase::Stacked)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Settle,
    Restack,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    id: TimerId,
    transition: Transition,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeckAction {
    pub should_redraw: bool,
}

impl DeckAction {
    pub fn new(should_redraw: bool) -> Self {
        Self { should_redraw }
    }

    pub fn none() -> Self {
        Self::new(false)
    }

    pub fn redraw() -> Self {
        Self::new(true)
    }
}

/// The lucky-draw deck: four face-down cards that spread on the first touch,
/// reveal exactly one prize, and are dealt afresh on reset.
///
/// All timing goes through the host's [`Scheduler`]; at most one timer is
/// outstanding and any id other than the current one is ignored, so a timer
/// that fires late (after a superseding transition or after unmount) cannot
/// touch the deck.
pub struct Deck<S: Scheduler, V: Viewport> {
    pool: PrizePool,
    slots: Vec<CardSlot>,
    phase: Phase,
    metrics: LayoutMetrics,
    pending: Option<PendingTimer>,
    subscription: Option<SubscriptionId>,
    mounted: bool,
    next_timer: u64,
    scheduler: S,
    viewport: V,
}

impl<S: Scheduler, V: Viewport> Deck<S, V> {
    pub fn mount(pool: PrizePool, scheduler: S, mut viewport: V) -> Self {
        let subscription = viewport.subscribe();
        let metrics = compute_metrics(viewport.width());

        let mut deck = Self {
            pool,
            slots: Vec::new(),
            phase: Phase::Stacked,
            metrics,
            pending: None,
            subscription: Some(subscription),
            mounted: true,
            next_timer: 0,
            scheduler,
            viewport,
        };
        deck.slots = deck.deal();

        log::debug!(
            "Deck mounted with {} of {} prizes",
            deck.slots.len(),
            deck.pool.len()
        );
        deck
    }

    fn deal(&mut self) -> Vec<CardSlot> {
        self.pool
            .draw()
            .into_iter()
            .enumerate()
            .map(|(i, prize)| CardSlot {
                id: CardId(i),
                prize,
                revealed: false,
            })
            .collect()
    }

    /// A card was clicked or activated from the keyboard.
    pub fn trigger(&mut self, id: CardId) -> DeckAction {
        if !self.mounted {
            return DeckAction::none();
        }

        match self.phase {
            Phase::Stacked => self.spread(),
            Phase::Spread { selected: None } => self.select(id),
            phase => {
                log::trace!("Ignoring card {} while {}", id, phase);
                DeckAction::none()
            }
        }
    }

    pub fn spread(&mut self) -> DeckAction {
        if !self.mounted || self.phase != Phase::Stacked {
            log::trace!("Spread ignored while {}", self.phase);
            return DeckAction::none();
        }

        self.phase = Phase::Spreading;
        self.start_timer(SPREAD_DURATION, Transition::Settle);
        log::debug!("Deck spreading");
        DeckAction::redraw()
    }

    fn select(&mut self, id: CardId) -> DeckAction {
        let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) else {
            log::trace!("No card {} in this batch", id);
            return DeckAction::none();
        };

        slot.revealed = true;
        self.phase = Phase::Spread { selected: Some(id) };
        log::debug!("Card {} revealed '{}'", id, slot.prize);
        DeckAction::redraw()
    }

    /// Flips the revealed card back and deals a new batch once the flip is
    /// over. The card reports unrevealed right away, not after the flip.
    pub fn reset(&mut self) -> DeckAction {
        if !self.mounted {
            return DeckAction::none();
        }
        let Phase::Spread { selected: Some(id) } = self.phase else {
            log::trace!("Reset ignored while {}", self.phase);
            return DeckAction::none();
        };

        if let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) {
            slot.revealed = false;
        }
        self.phase = Phase::Resetting;
        self.start_timer(RESET_DURATION, Transition::Restack);
        log::debug!("Deck resetting");
        DeckAction::redraw()
    }

    pub fn on_timer(&mut self, timer: TimerId) -> DeckAction {
        if !self.mounted {
            return DeckAction::none();
        }
        let pending = match self.pending {
            Some(p) if p.id == timer => p,
            _ => {
                log::trace!("Stale timer {}", timer);
                return DeckAction::none();
            }
        };
        self.pending = None;

        match (pending.transition, self.phase) {
            (Transition::Settle, Phase::Spreading) => {
                self.phase = Phase::Spread { selected: None };
            }
            (Transition::Restack, Phase::Resetting) => {
                self.slots = self.deal();
                self.phase = Phase::Stacked;
            }
            (transition, phase) => {
                log::warn!("Timer for {:?} fired while {}", transition, phase);
                return DeckAction::none();
            }
        }
        log::debug!("Deck {}", self.phase);
        DeckAction::redraw()
    }

    /// Re-reads the viewport width. Only the layout changes; cards and phase
    /// are left alone even mid-transition.
    pub fn on_resize(&mut self) -> DeckAction {
        if !self.mounted {
            return DeckAction::none();
        }
        let metrics = compute_metrics(self.viewport.width());
        if metrics == self.metrics {
            return DeckAction::none();
        }
        self.metrics = metrics;
        DeckAction::redraw()
    }

    /// Swaps the prize source and deals a stacked batch from it, dropping any
    /// transition in flight.
    pub fn remount(&mut self, pool: PrizePool) -> DeckAction {
        if !self.mounted {
            return DeckAction::none();
        }
        self.cancel_pending();
        self.pool = pool;
        self.slots = self.deal();
        self.phase = Phase::Stacked;
        log::debug!("Deck remounted with {} prizes", self.pool.len());
        DeckAction::redraw()
    }

    /// Cancels the outstanding timer and drops the resize subscription. Safe
    /// to call more than once; also runs on drop.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.cancel_pending();
        if let Some(id) = self.subscription.take() {
            self.viewport.unsubscribe(id);
        }
        log::debug!("Deck unmounted");
    }

    fn start_timer(&mut self, delay: Duration, transition: Transition) {
        self.cancel_pending();
        self.next_timer += 1;
        let id = TimerId::from(self.next_timer);
        self.scheduler.schedule(delay, id);
        self.pending = Some(PendingTimer { id, transition });
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.scheduler.cancel(pending.id);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected(&self) -> Option<CardId> {
        self.phase.selected()
    }

    pub fn slots(&self) -> &[CardSlot] {
        &self.slots
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// The prize list the deck deals from.
    pub fn prizes(&self) -> &[PrizeLabel] {
        self.pool.prizes()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn has_pending_timer(&self) -> bool {
        self.pending.is_some()
    }

    /// The reset control is only shown, and only hit-testable, while a prize
    /// is on display.
    pub fn reset_visible(&self) -> bool {
        matches!(self.phase, Phase::Spread { selected: Some(_) })
    }

    pub fn pose(&self, index: usize) -> Option<CardPose> {
        self.slots.get(index).map(|slot| {
            pose::card_pose(&self.metrics, index, self.phase.is_stacked(), slot.revealed)
        })
    }

    pub fn flags(&self, index: usize) -> Option<CardFlags> {
        self.slots
            .get(index)
            .map(|slot| pose::card_flags(self.phase, slot))
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }
}

impl<S: Scheduler, V: Viewport> Drop for Deck<S, V> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::host::testing::{ManualScheduler, ManualViewport};
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    type TestDeck = Deck<ManualScheduler, ManualViewport>;

    const PRIZES: [&str; 6] = ["Prize 1", "Prize 2", "Prize 3", "Prize 4", "Prize 5", "Prize 6"];

    fn mount(prizes: &[&str]) -> TestDeck {
        Deck::mount(
            PrizePool::seeded(prizes, 5),
            ManualScheduler::default(),
            ManualViewport::new(1024.0),
        )
    }

    fn advance(deck: &mut TestDeck, by: Duration) {
        let fired = deck.scheduler_mut().advance(by);
        for timer in fired {
            deck.on_timer(timer);
        }
    }

    fn spread_deck() -> TestDeck {
        let mut deck = mount(&PRIZES);
        deck.trigger(CardId::from(0));
        advance(&mut deck, SPREAD_DURATION);
        assert_eq!(deck.phase(), Phase::Spread { selected: None });
        deck
    }

    #[test]
    fn test_mount_deals_four_stacked_cards() {
        let deck = mount(&PRIZES);

        assert_eq!(deck.phase(), Phase::Stacked);
        assert_eq!(deck.selected(), None);
        assert_eq!(deck.slots().len(), 4);

        let ids: HashSet<usize> = deck.slots().iter().map(|s| s.id.index()).collect();
        assert_eq!(ids, HashSet::from([0, 1, 2, 3]));
        assert!(deck.slots().iter().all(|s| !s.revealed));
        assert!(deck.slots().iter().all(|s| PRIZES.contains(&s.prize.as_str())));
        assert!(!deck.reset_visible());
        assert_eq!(deck.viewport().active.len(), 1);
    }

    #[test]
    fn test_mount_with_no_prizes() {
        let mut deck = mount(&[]);
        assert!(deck.slots().is_empty());
        assert_eq!(deck.pose(0), None);
        assert_eq!(deck.metrics().card_width, 240.0);

        // the stack can still be spread, there is just nothing on it
        assert!(deck.spread().should_redraw);
        advance(&mut deck, SPREAD_DURATION);
        assert!(!deck.trigger(CardId::from(0)).should_redraw);
        assert_eq!(deck.phase(), Phase::Spread { selected: None });
    }

    #[test]
    fn test_mount_with_two_prizes() {
        let deck = mount(&["Prize 1", "Prize 2"]);
        assert_eq!(deck.slots().len(), 2);
        assert_eq!(deck.slots()[1].id, CardId::from(1));
    }

    #[test]
    fn test_duplicate_prizes_keep_unique_ids() {
        let deck = mount(&["Same"; 5]);
        let ids: HashSet<CardId> = deck.slots().iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_trigger_spreads_after_animation_budget() {
        let mut deck = mount(&PRIZES);

        assert!(deck.trigger(CardId::from(3)).should_redraw);
        assert_eq!(deck.phase(), Phase::Spreading);

        // re-entrant activation does not schedule a second transition
        assert!(!deck.trigger(CardId::from(1)).should_redraw);
        assert!(!deck.spread().should_redraw);
        assert_eq!(deck.scheduler().scheduled.len(), 1);
        assert_eq!(deck.scheduler().pending(), 1);

        advance(&mut deck, Duration::from_millis(1399));
        assert_eq!(deck.phase(), Phase::Spreading);

        advance(&mut deck, Duration::from_millis(1));
        assert_eq!(deck.phase(), Phase::Spread { selected: None });
        assert!(deck.slots().iter().all(|s| !s.revealed));
    }

    #[test]
    fn test_no_selection_while_spreading() {
        let mut deck = mount(&PRIZES);
        deck.trigger(CardId::from(0));
        deck.trigger(CardId::from(2));
        assert!(deck.slots().iter().all(|s| !s.revealed));
        assert_eq!(deck.selected(), None);
    }

    #[test]
    fn test_select_reveals_one_card() {
        let mut deck = spread_deck();

        assert!(deck.trigger(CardId::from(2)).should_redraw);
        assert!(deck.slots()[2].revealed);
        assert_eq!(deck.selected(), Some(CardId::from(2)));
        assert!(deck.reset_visible());

        assert!(!deck.trigger(CardId::from(0)).should_redraw);
        assert!(!deck.slots()[0].revealed);
        assert_eq!(deck.slots().iter().filter(|s| s.revealed).count(), 1);
    }

    #[test]
    fn test_select_unknown_card_is_ignored() {
        let mut deck = spread_deck();
        assert!(!deck.trigger(CardId::from(9)).should_redraw);
        assert_eq!(deck.phase(), Phase::Spread { selected: None });
    }

    #[test]
    fn test_reset_deals_a_fresh_batch() {
        let mut deck = spread_deck();
        deck.trigger(CardId::from(2));

        assert!(deck.reset().should_redraw);
        assert_eq!(deck.phase(), Phase::Resetting);
        assert!(!deck.slots()[2].revealed);
        assert_eq!(deck.selected(), None);
        assert!(!deck.reset_visible());

        // nothing is clickable mid-reset, reset itself included
        assert!(!deck.trigger(CardId::from(1)).should_redraw);
        assert!(!deck.reset().should_redraw);

        advance(&mut deck, Duration::from_millis(799));
        assert_eq!(deck.phase(), Phase::Resetting);

        advance(&mut deck, Duration::from_millis(1));
        assert_eq!(deck.phase(), Phase::Stacked);
        assert_eq!(deck.slots().len(), 4);
        let ids: Vec<usize> = deck.slots().iter().map(|s| s.id.index()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(deck.slots().iter().all(|s| !s.revealed));
        assert!(deck.slots().iter().all(|s| PRIZES.contains(&s.prize.as_str())));
    }

    #[test]
    fn test_reset_without_selection_is_ignored() {
        let mut deck = mount(&PRIZES);
        assert!(!deck.reset().should_redraw);
        assert_eq!(deck.phase(), Phase::Stacked);

        deck.spread();
        assert!(!deck.reset().should_redraw);
        assert_eq!(deck.phase(), Phase::Spreading);

        advance(&mut deck, SPREAD_DURATION);
        assert!(!deck.reset().should_redraw);
        assert!(deck.scheduler().cancelled.is_empty());
    }

    #[test]
    fn test_full_round_trip_twice() {
        let mut deck = spread_deck();
        deck.trigger(CardId::from(1));
        deck.reset();
        advance(&mut deck, RESET_DURATION);

        deck.trigger(CardId::from(0));
        advance(&mut deck, SPREAD_DURATION);
        deck.trigger(CardId::from(3));
        assert_eq!(deck.selected(), Some(CardId::from(3)));
        assert_eq!(deck.scheduler().scheduled.len(), 3);
    }

    #[test]
    fn test_resize_mid_animation_keeps_phase() {
        let mut deck = mount(&PRIZES);
        deck.spread();
        let before: Vec<CardSlot> = deck.slots().to_vec();

        deck.viewport_mut().width = 400.0;
        assert!(deck.on_resize().should_redraw);
        assert_eq!(deck.metrics().card_width, 168.0);
        assert_eq!(deck.phase(), Phase::Spreading);
        assert_eq!(deck.slots(), before.as_slice());

        // same breakpoint, same metrics
        deck.viewport_mut().width = 400.0;
        assert!(!deck.on_resize().should_redraw);

        advance(&mut deck, SPREAD_DURATION);
        assert_eq!(deck.phase(), Phase::Spread { selected: None });
    }

    #[test]
    fn test_unmount_while_spreading() {
        let mut deck = mount(&PRIZES);
        deck.trigger(CardId::from(0));
        let timer = *deck.scheduler().scheduled.last().unwrap();

        deck.unmount();
        deck.unmount();

        assert!(!deck.is_mounted());
        assert!(!deck.has_pending_timer());
        assert_eq!(deck.scheduler().cancelled, vec![timer]);
        assert_eq!(deck.scheduler().pending(), 0);
        assert_eq!(deck.viewport().unsubscribed.len(), 1);
        assert!(deck.viewport().active.is_empty());

        // a timer that slipped through before cancellation changes nothing
        assert!(!deck.on_timer(timer).should_redraw);
        assert_eq!(deck.phase(), Phase::Spreading);
        assert!(!deck.on_resize().should_redraw);
        assert!(!deck.trigger(CardId::from(0)).should_redraw);
    }

    #[derive(Default)]
    struct LoggingViewport {
        unsubscribed: Rc<RefCell<Vec<SubscriptionId>>>,
    }

    impl Viewport for LoggingViewport {
        fn width(&self) -> f64 {
            f64::NAN
        }

        fn subscribe(&mut self) -> SubscriptionId {
            SubscriptionId::from(7)
        }

        fn unsubscribe(&mut self, id: SubscriptionId) {
            self.unsubscribed.borrow_mut().push(id);
        }
    }

    #[test]
    fn test_drop_unsubscribes_once() {
        let viewport = LoggingViewport::default();
        let log = viewport.unsubscribed.clone();

        let mut deck = Deck::mount(
            PrizePool::seeded(&PRIZES, 1),
            ManualScheduler::default(),
            viewport,
        );
        assert_eq!(deck.metrics().card_width, 240.0);
        deck.unmount();
        drop(deck);
        assert_eq!(*log.borrow(), vec![SubscriptionId::from(7)]);

        let deck = Deck::mount(
            PrizePool::seeded(&PRIZES, 1),
            ManualScheduler::default(),
            LoggingViewport {
                unsubscribed: log.clone(),
            },
        );
        drop(deck);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut deck = mount(&PRIZES);
        deck.spread();
        assert!(!deck.on_timer(TimerId::from(99)).should_redraw);
        assert_eq!(deck.phase(), Phase::Spreading);
    }

    #[test]
    fn test_remount_cancels_transition() {
        let mut deck = spread_deck();
        deck.trigger(CardId::from(0));
        deck.reset();

        assert!(deck.remount(PrizePool::seeded(&["A", "B", "C"], 1)).should_redraw);
        assert_eq!(deck.phase(), Phase::Stacked);
        assert_eq!(deck.slots().len(), 3);
        assert_eq!(deck.scheduler().pending(), 0);

        advance(&mut deck, RESET_DURATION);
        assert_eq!(deck.phase(), Phase::Stacked);
    }

    #[test]
    fn test_poses_follow_phase() {
        let mut deck = mount(&PRIZES);
        let stacked = deck.pose(0).unwrap();
        assert_eq!(stacked.rotate_deg, -12.0);

        deck.spread();
        let spreading = deck.pose(0).unwrap();
        assert_eq!(spreading.rotate_deg, 0.0);
        assert_eq!(spreading.offset, deck.metrics().spread_offset(0));
    }
}
