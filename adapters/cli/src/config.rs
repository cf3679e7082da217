//! TOML configuration schema mapped onto [`SessionConfig`].

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use hexbound_core::CellColor;
use hexbound_session::SessionConfig;
use serde::Deserialize;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Root of a configuration file. Every section is optional and every
/// omitted key keeps its built-in default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfigFile {
    version: Option<u32>,
    seed: Option<u64>,
    test_mode: bool,
    world: WorldSection,
    weapons: WeaponsSection,
    waves: WavesSection,
    collision: CollisionSection,
    fields: FieldsSection,
    progression: ProgressionSection,
    viewport: ViewportSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WorldSection {
    core_color: Option<CellColor>,
    hex_radius: Option<f32>,
    arena_half_extent: Option<f32>,
    player_speed: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WeaponsSection {
    base_interval: Option<f32>,
    damage: Option<f32>,
    speed: Option<f32>,
    size: Option<f32>,
    lifetime: Option<f32>,
    spread: Option<f32>,
    homing_turn_rate: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WavesSection {
    wave_secs: Option<f32>,
    spawn_margin: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CollisionSection {
    collect_radius: Option<f32>,
    magnet_radius: Option<f32>,
    magnet_speed: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FieldsSection {
    shockwave_interval_secs: Option<f32>,
    shockwave_radius: Option<f32>,
    shockwave_strength: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ProgressionSection {
    choices: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ViewportSection {
    half_width: Option<f32>,
    half_height: Option<f32>,
}

/// Overrides taken from the command line.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) test_mode: bool,
}

/// Reads and parses the configuration file at `path`.
pub(crate) fn load(path: &Path) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

/// Parses configuration file contents.
pub(crate) fn parse(contents: &str) -> Result<ConfigFile> {
    let file: ConfigFile =
        toml::from_str(contents).context("failed to parse config toml contents")?;
    if let Some(version) = file.version {
        if version != SUPPORTED_CONFIG_VERSION {
            bail!(
                "unsupported config version {version}; expected {SUPPORTED_CONFIG_VERSION}"
            );
        }
    }
    Ok(file)
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn positive(name: &str, value: Option<f32>) -> Result<Option<f32>> {
    match value {
        Some(value) if !(value.is_finite() && value > 0.0) => {
            bail!("`{name}` must be a positive number, got {value}")
        }
        other => Ok(other),
    }
}

impl ConfigFile {
    /// Seed after applying `overrides`.
    pub(crate) fn seed(&self, overrides: Overrides) -> u64 {
        overrides.seed.or(self.seed).unwrap_or(0)
    }

    /// Builds the session configuration, validating every value.
    pub(crate) fn into_session_config(self, overrides: Overrides) -> Result<SessionConfig> {
        let seed = self.seed(overrides);
        let mut config = SessionConfig::seeded(seed);

        let world = self.world;
        set(&mut config.world.core_color, world.core_color);
        set(&mut config.world.hex_radius, positive("world.hex_radius", world.hex_radius)?);
        set(
            &mut config.world.arena_half_extent,
            positive("world.arena_half_extent", world.arena_half_extent)?,
        );
        set(
            &mut config.world.player_speed,
            positive("world.player_speed", world.player_speed)?,
        );

        let weapons = self.weapons;
        set(
            &mut config.weapons.base_interval,
            positive("weapons.base_interval", weapons.base_interval)?,
        );
        set(&mut config.weapons.damage, positive("weapons.damage", weapons.damage)?);
        set(&mut config.weapons.speed, positive("weapons.speed", weapons.speed)?);
        set(&mut config.weapons.size, positive("weapons.size", weapons.size)?);
        set(&mut config.weapons.lifetime, positive("weapons.lifetime", weapons.lifetime)?);
        set(&mut config.weapons.spread, weapons.spread);
        set(&mut config.weapons.homing_turn_rate, weapons.homing_turn_rate);

        if let Some(secs) = positive("waves.wave_secs", self.waves.wave_secs)? {
            config.waves.wave_duration = Duration::from_secs_f32(secs);
        }
        set(&mut config.waves.spawn_margin, self.waves.spawn_margin);
        if self.test_mode || overrides.test_mode {
            config.waves = config.waves.with_test_mode();
        }

        let collision = self.collision;
        set(&mut config.collision.collect_radius, collision.collect_radius);
        set(&mut config.collision.magnet_radius, collision.magnet_radius);
        set(&mut config.collision.magnet_speed, collision.magnet_speed);

        let fields = self.fields;
        if let Some(secs) = positive("fields.shockwave_interval_secs", fields.shockwave_interval_secs)? {
            config.fields.shockwave_interval = Duration::from_secs_f32(secs);
        }
        set(&mut config.fields.shockwave_radius, fields.shockwave_radius);
        set(&mut config.fields.shockwave_strength, fields.shockwave_strength);

        set(&mut config.progression.choices, self.progression.choices);

        let mut half = config.viewport_half_extents;
        set(&mut half.x, positive("viewport.half_width", self.viewport.half_width)?);
        set(&mut half.y, positive("viewport.half_height", self.viewport.half_height)?);
        config.viewport_half_extents = Vec2::new(half.x, half.y);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../config/hexbound.toml");

    #[test]
    fn empty_file_yields_seeded_defaults() {
        let file = parse("").expect("empty config parses");
        let config = file
            .into_session_config(Overrides::default())
            .expect("defaults are valid");
        assert_eq!(config, SessionConfig::seeded(0));
    }

    #[test]
    fn sample_config_parses() {
        let file = parse(SAMPLE).expect("sample config parses");
        let config = file
            .into_session_config(Overrides::default())
            .expect("sample config is valid");
        assert_eq!(config.world.core_color, CellColor::Red);
        assert_eq!(config.waves.wave_duration, Duration::from_secs(30));
    }

    #[test]
    fn command_line_overrides_win() {
        let file = parse("seed = 4\n").expect("config parses");
        let overrides = Overrides {
            seed: Some(9),
            test_mode: true,
        };
        assert_eq!(file.seed(overrides), 9);
        let config = file.into_session_config(overrides).expect("valid");
        assert_eq!(config.waves.wave_duration, Duration::from_secs(5));
        assert_eq!(config.waves.rng_seed, 9);
    }

    #[test]
    fn rejects_unknown_keys_and_versions() {
        assert!(parse("[weapons]\nlaser = true\n").is_err());
        assert!(parse("version = 7\n").is_err());
    }

    #[test]
    fn rejects_non_positive_values() {
        let file = parse("[world]\nhex_radius = 0.0\n").expect("config parses");
        let error = file
            .into_session_config(Overrides::default())
            .expect_err("zero radius is rejected");
        assert!(error.to_string().contains("world.hex_radius"));
    }
}
