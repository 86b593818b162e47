//! Commit analysis: convention detection and bump recommendation

pub mod bump;
pub mod detector;

pub use bump::{BumpRecommender, PresetRecommender};
pub use detector::{ConventionDetector, HeaderDetector};
