//! World-level properties: difficulty tiers and biome identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Game difficulty. `Peaceful` means no hostile mobs spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Peaceful,
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Whether hostile mobs can exist at this difficulty.
    pub fn allows_hostiles(self) -> bool {
        self != Difficulty::Peaceful
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "peaceful" | "0" => Ok(Difficulty::Peaceful),
            "easy" | "1" => Ok(Difficulty::Easy),
            "normal" | "2" => Ok(Difficulty::Normal),
            "hard" | "3" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Peaceful => "peaceful",
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

/// Namespaced biome identifier, e.g. `minecraft:plains`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BiomeId(pub String);

impl BiomeId {
    /// Hostile mobs never spawn naturally here.
    pub const MUSHROOM_FIELDS: &'static str = "minecraft:mushroom_fields";
    pub const PLAINS: &'static str = "minecraft:plains";

    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        if id.contains(':') {
            Self(id)
        } else {
            Self(format!("minecraft:{id}"))
        }
    }

    pub fn mushroom_fields() -> Self {
        Self(Self::MUSHROOM_FIELDS.to_string())
    }

    pub fn plains() -> Self {
        Self(Self::PLAINS.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier without its namespace.
    pub fn path(&self) -> &str {
        self.0.split_once(':').map(|(_, p)| p).unwrap_or(&self.0)
    }
}

impl fmt::Display for BiomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
