//! Mob reachability: spawn scanning, navigation probes, and path evaluation.

pub mod grid_nav;
pub mod navigation;
pub mod reachability;
pub mod scanner;
