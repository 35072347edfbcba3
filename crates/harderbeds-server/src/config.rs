use harderbeds_game::{SearchConfig, SearchConfigError};
use harderbeds_world::{BiomeId, Difficulty};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub logging: LoggingSection,
    #[serde(default)]
    pub settings: SettingsSection,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub world: WorldSection,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct SettingsSection {
    /// Location of the JSON settings document.
    #[serde(default = "default_settings_path")]
    pub path: PathBuf,
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("config/harderbeds/settings.json")
}

impl Default for SettingsSection {
    fn default() -> Self {
        Self {
            path: default_settings_path(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchSection {
    #[serde(default = "default_horizontal_radius")]
    pub horizontal_radius: i32,
    #[serde(default = "default_vertical_radius")]
    pub vertical_radius: i32,
    #[serde(default = "default_inner_exclusion_radius")]
    pub inner_exclusion_radius: i32,
    #[serde(default = "default_min_light_level")]
    pub min_light_level: u8,
}

fn default_horizontal_radius() -> i32 {
    SearchConfig::DEFAULT_HORIZONTAL_RADIUS
}

fn default_vertical_radius() -> i32 {
    SearchConfig::DEFAULT_VERTICAL_RADIUS
}

fn default_inner_exclusion_radius() -> i32 {
    SearchConfig::DEFAULT_INNER_EXCLUSION_RADIUS
}

fn default_min_light_level() -> u8 {
    SearchConfig::DEFAULT_MIN_LIGHT_LEVEL
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            horizontal_radius: default_horizontal_radius(),
            vertical_radius: default_vertical_radius(),
            inner_exclusion_radius: default_inner_exclusion_radius(),
            min_light_level: default_min_light_level(),
        }
    }
}

impl SearchSection {
    pub fn to_search_config(&self) -> Result<SearchConfig, SearchConfigError> {
        SearchConfig::new(
            self.horizontal_radius,
            self.vertical_radius,
            self.inner_exclusion_radius,
            self.min_light_level,
        )
    }
}

/// Parameters of the demo scene.
#[derive(Debug, Deserialize)]
pub struct WorldSection {
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_biome")]
    pub biome: String,
    #[serde(default)]
    pub seed: u64,
    /// Simulated time of day when the player wakes up.
    #[serde(default)]
    pub wake_time: i64,
}

fn default_difficulty() -> String {
    "normal".into()
}

fn default_biome() -> String {
    "plains".into()
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            biome: default_biome(),
            seed: 0,
            wake_time: 0,
        }
    }
}

impl WorldSection {
    pub fn difficulty(&self) -> Result<Difficulty, String> {
        self.difficulty.parse()
    }

    pub fn biome(&self) -> BiomeId {
        BiomeId::new(self.biome.as_str())
    }
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.search.to_search_config()?;
        config.world.difficulty()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config() {
        let toml_str = r#"
            [logging]
            level = "debug"

            [settings]
            path = "run/settings.json"

            [search]
            horizontal_radius = 12
            vertical_radius = 6
            inner_exclusion_radius = 2
            min_light_level = 7

            [world]
            difficulty = "hard"
            biome = "minecraft:mushroom_fields"
            seed = 42
            wake_time = 24500
        "#;

        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.settings.path, PathBuf::from("run/settings.json"));

        let search = config.search.to_search_config().unwrap();
        assert_eq!(search.horizontal_radius, 12);
        assert_eq!(search.vertical_radius, 6);
        assert_eq!(search.inner_exclusion_radius, 2);
        assert_eq!(search.min_light_level, 7);

        assert_eq!(config.world.difficulty().unwrap(), Difficulty::Hard);
        assert_eq!(config.world.biome(), BiomeId::mushroom_fields());
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.wake_time, 24500);
    }

    #[test]
    fn optional_sections_default() {
        let config: ServerConfig = toml::from_str("[logging]\nlevel = \"info\"\n").unwrap();
        assert_eq!(
            config.settings.path,
            PathBuf::from("config/harderbeds/settings.json")
        );
        assert_eq!(
            config.search.to_search_config().unwrap(),
            SearchConfig::default()
        );
        assert_eq!(config.world.difficulty().unwrap(), Difficulty::Normal);
        assert_eq!(config.world.biome(), BiomeId::plains());
        assert_eq!(config.world.seed, 0);
    }

    #[test]
    fn partial_search_section() {
        let toml_str = r#"
            [logging]
            level = "info"

            [search]
            min_light_level = 12
        "#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        let search = config.search.to_search_config().unwrap();
        assert_eq!(search.min_light_level, 12);
        assert_eq!(
            search.horizontal_radius,
            SearchConfig::DEFAULT_HORIZONTAL_RADIUS
        );
    }

    #[test]
    fn invalid_values_are_reported() {
        let toml_str = r#"
            [logging]
            level = "info"

            [search]
            horizontal_radius = 3
            inner_exclusion_radius = 3

            [world]
            difficulty = "nightmare"
        "#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert!(config.search.to_search_config().is_err());
        assert!(config.world.difficulty().is_err());
    }

    #[test]
    fn missing_logging_section_is_an_error() {
        assert!(toml::from_str::<ServerConfig>("[world]\nseed = 1\n").is_err());
    }

    #[test]
    fn load_rejects_invalid_search_bounds() {
        let path = std::env::temp_dir().join(format!(
            "harderbeds_config_{}.toml",
            rand::random::<u64>()
        ));
        std::fs::write(
            &path,
            "[logging]\nlevel = \"info\"\n[search]\nvertical_radius = 2\n",
        )
        .unwrap();
        assert!(ServerConfig::load(&path).is_err());
        std::fs::remove_file(&path).ok();
    }
}
