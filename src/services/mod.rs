pub mod normalize;
pub mod recommend;
pub mod scoring;
pub mod storage;

pub use recommend::{Recommender, ScannerConfig};
pub use scoring::ScoringEngine;
pub use storage::StateStore;
