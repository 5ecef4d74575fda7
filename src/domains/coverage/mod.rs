pub mod aggregate;
pub mod events;
pub mod planner;
pub mod ports;
pub mod preview;

pub use aggregate::*;
pub use events::*;
pub use planner::*;
pub use ports::*;
pub use preview::*;
