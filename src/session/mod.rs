mod manager;
mod tracker;
mod types;

pub use manager::SessionManager;
pub use tracker::SessionTracker;
pub use types::{DimensionDelta, Deltas, Revision, ScoreDelta, Session};
