pub mod control;
pub mod geom;
pub mod macros;
pub mod metrics;
pub mod prize;
pub mod shadow;
pub mod spring;
pub mod tilt;

pub use geom::{Bounds, Point};
pub use metrics::{CardStyle, LayoutMetrics, StackedPose, compute_metrics};
pub use prize::{PrizeLabel, PrizePool};
pub use spring::{Spring, SpringConfig};
pub use tilt::{Tilt, TiltConfig, TiltPose};
