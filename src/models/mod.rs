pub mod pool;
pub mod recommendation;

pub use pool::{PoolMetrics, Snapshot};
pub use recommendation::Recommendation;
