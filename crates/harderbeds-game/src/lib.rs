//! Bed rules: mob reachability checks, search tuning, and feature toggles.

pub mod ai;
pub mod particles;
pub mod safety;
pub mod search;
pub mod settings;

pub use ai::navigation::{NavError, NavigationOracle, Path, ProbeId};
pub use safety::{BedTarget, SafetyService, SafetyVerdict};
pub use search::{SearchConfig, SearchConfigError};
pub use settings::Settings;
