//! Seams between the deck model and whatever hosts it.
//!
//! The deck never sleeps or listens on its own. It asks a [`Scheduler`] for
//! one-shot timers and a [`Viewport`] for width and resize subscriptions; the
//! host calls back into the deck when either fires.

use derive_more::{Display, From, Into};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct SubscriptionId(u64);

pub trait Scheduler {
    /// Arrange for `Deck::on_timer(timer)` to be called once after `delay`.
    fn schedule(&mut self, delay: Duration, timer: TimerId);
    /// Drop a timer that has not fired yet. Unknown ids are ignored.
    fn cancel(&mut self, timer: TimerId);
}

pub trait Viewport {
    fn width(&self) -> f64;
    /// Start delivering resize notifications through `Deck::on_resize`.
    fn subscribe(&mut self) -> SubscriptionId;
    fn unsubscribe(&mut self, id: SubscriptionId);
}
