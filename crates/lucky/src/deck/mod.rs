use std::time::Duration;

pub mod host;
pub mod model;
pub mod motion;
pub mod pose;
pub mod scene;
pub mod stage;

pub use host::{Scheduler, SubscriptionId, TimerId, Viewport};
pub use model::{CardId, CardSlot, Deck, DeckAction, Phase};
pub use motion::{CardMotion, MotionFrame};
pub use pose::{CardFlags, CardPose};
pub use scene::{CardView, Scene};
pub use stage::Stage;

pub const SPREAD_STAGGER: Duration = Duration::from_millis(150); // per card
pub const SPREAD_SETTLE: Duration = Duration::from_millis(800);
/// Four staggered cards plus the settle time.
pub const SPREAD_DURATION: Duration =
    Duration::from_millis(4 * SPREAD_STAGGER.as_millis() as u64 + SPREAD_SETTLE.as_millis() as u64);
/// Matches the flip-back animation of the revealed card.
pub const RESET_DURATION: Duration = Duration::from_millis(800);
pub const FLIP_DURATION: Duration = Duration::from_millis(800);

pub const STACK_DELAY_STEP: Duration = Duration::from_millis(80);
pub const SPREAD_DELAY_STEP: Duration = Duration::from_millis(120);
pub const REVEALED_SCALE: f64 = 1.18;
pub const REVEALED_Z: i32 = 20;

pub const SPREAD_LABEL: &str = "Spread the cards";
pub const SELECT_LABEL: &str = "Select a card";
pub const RESET_LABEL: &str = "Try another prize";
pub const RESET_CAPTION: &str = "Try Again";
