//! Feature toggles read by every bed check.

use serde::{Deserialize, Serialize};

/// User-facing toggles. Missing fields in a settings document take their
/// default (`true`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Check whether hostile mobs can reach a bed before allowing sleep.
    pub simulate_mob_pathing_on_sleep: bool,
    /// Show the simulated mob path with particles.
    pub visualize_mob_path: bool,
    /// Beds broken inside a village do not drop an item.
    pub prevent_bed_drop_in_villages: bool,
    /// Sleeping in a village bed applies negative effects on waking.
    pub enable_village_bed_penalty: bool,
    pub disable_phantom_spawning: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulate_mob_pathing_on_sleep: true,
            visualize_mob_path: true,
            prevent_bed_drop_in_villages: true,
            enable_village_bed_penalty: true,
            disable_phantom_spawning: true,
        }
    }
}
