#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns weapon cells and their synergies into projectiles.
//!
//! The core and every red module are weapons. Each keeps its own cooldown in
//! a dense array indexed by [`CellId`]; when it expires while the player holds
//! fire and has a target, the weapon releases a volley shaped by the local
//! synergies of its cell.

use glam::Vec2;
use hexbound_core::{
    CellId, Command, Event, GrowthSpec, HexLayout, HomingSpec, PlayMode, ProjectileSpec,
    ShipView,
};
use hexbound_system_synergy::{CellSynergies, SynergyKind, SynergyResolution, SynergyStats};

/// Fire interval multiplier applied once per RapidFire stack.
pub const RAPID_FIRE_FACTOR: f32 = 0.7;
/// Projectile speed multiplier of heavy-impact weapons.
pub const HEAVY_SPEED_FACTOR: f32 = 0.6;
/// Damage bonus per HeavyImpact stack.
pub const HEAVY_DAMAGE_PER_STACK: f32 = 0.25;
/// Size multiplier of heavy-impact projectiles.
pub const HEAVY_SIZE_FACTOR: f32 = 1.3;
/// Damage multiplier of piercing projectiles.
pub const PIERCING_DAMAGE_FACTOR: f32 = 1.2;
/// Extra maximum growth scale per Growth stack.
pub const GROWTH_SCALE_PER_STACK: f32 = 0.5;
/// Growth rate per world unit travelled, per Growth stack.
pub const GROWTH_RATE_PER_STACK: f32 = 0.004;

/// Tunable base stats shared by every weapon cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Seconds between volleys before synergies.
    pub base_interval: f32,
    /// Damage of a single projectile.
    pub damage: f32,
    /// Projectile speed in world units per second.
    pub speed: f32,
    /// Projectile collision radius.
    pub size: f32,
    /// Seconds a projectile lives.
    pub lifetime: f32,
    /// Angle in radians between adjacent projectiles of a volley.
    pub spread: f32,
    /// Radians per second homing projectiles may turn.
    pub homing_turn_rate: f32,
    /// Speed added per Homing stack.
    pub homing_speed_per_stack: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_interval: 0.8,
            damage: 10.0,
            speed: 420.0,
            size: 6.0,
            lifetime: 1.6,
            spread: 0.14,
            homing_turn_rate: 3.0,
            homing_speed_per_stack: 40.0,
        }
    }
}

/// Player intent relevant to firing, sampled at the start of the tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FireControl {
    /// World-space point to aim at, if anything is targeted.
    pub target: Option<Vec2>,
    /// Whether the player holds fire.
    pub firing: bool,
}

/// Volley produced by one weapon cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponProfile {
    /// Projectiles per volley.
    pub count: u32,
    /// Seconds between volleys.
    pub interval: f32,
    /// Stats of every projectile in the volley.
    pub spec: ProjectileSpec,
}

/// Weapon system tracking one cooldown per ship cell.
#[derive(Debug)]
pub struct Weapons {
    config: Config,
    cooldowns: Vec<f32>,
    scratch: Vec<Command>,
}

impl Weapons {
    /// Creates a weapon system with every weapon ready to fire.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cooldowns: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// Derives the volley of a weapon from its local synergies and the
    /// ship-wide stats.
    #[must_use]
    pub fn profile(&self, local: &CellSynergies, stats: &SynergyStats) -> WeaponProfile {
        let config = &self.config;
        let multishot = local.stacks(SynergyKind::MultiShot);
        let rapid = local.stacks(SynergyKind::RapidFire);
        let heavy = local.stacks(SynergyKind::HeavyImpact);
        let growth = local.stacks(SynergyKind::Growth);
        let homing = local.stacks(SynergyKind::Homing);
        let piercing = local.has(SynergyKind::Piercing);

        let mut damage_multiplier: f32 = 1.0;
        let mut size_multiplier: f32 = 1.0;
        let mut speed = config.speed;
        if heavy > 0 {
            damage_multiplier = damage_multiplier.max(1.0 + HEAVY_DAMAGE_PER_STACK * heavy as f32);
            size_multiplier = size_multiplier.max(HEAVY_SIZE_FACTOR);
            speed *= HEAVY_SPEED_FACTOR;
        }
        if piercing {
            damage_multiplier = damage_multiplier.max(PIERCING_DAMAGE_FACTOR);
        }
        if homing > 0 {
            speed += config.homing_speed_per_stack * homing as f32;
        }

        WeaponProfile {
            count: 1 + multishot + stats.bonus_projectiles,
            interval: config.base_interval
                * RAPID_FIRE_FACTOR.powi(rapid as i32)
                * stats.fire_interval_multiplier,
            spec: ProjectileSpec {
                damage: config.damage * damage_multiplier,
                speed,
                size: config.size * size_multiplier,
                lifetime: config.lifetime,
                piercing,
                homing: (homing > 0).then_some(HomingSpec {
                    turn_rate: config.homing_turn_rate,
                }),
                heavy: heavy > 0,
                growth: (growth > 0).then(|| GrowthSpec {
                    max_scale: 1.0 + GROWTH_SCALE_PER_STACK * growth as f32,
                    rate: GROWTH_RATE_PER_STACK * growth as f32,
                }),
                corrosive: stats.corrosion,
                entropic: stats.entropy,
            },
        }
    }

    /// Seconds until the weapon in `cell` may fire again.
    #[must_use]
    pub fn cooldown(&self, cell: CellId) -> f32 {
        self.cooldowns.get(cell.index()).copied().unwrap_or(0.0)
    }

    /// Advances cooldowns and emits `Command::FireProjectile` for every
    /// weapon ready to fire.
    #[allow(clippy::too_many_arguments)]
    pub fn handle(
        &mut self,
        events: &[Event],
        play_mode: PlayMode,
        ship: &ShipView<'_>,
        synergies: &SynergyResolution,
        layout: HexLayout,
        player: Vec2,
        control: FireControl,
        out: &mut Vec<Command>,
    ) {
        if play_mode != PlayMode::Running {
            return;
        }

        if self.cooldowns.len() < ship.len() {
            self.cooldowns.resize(ship.len(), 0.0);
        }

        let elapsed: f32 = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(dt.as_secs_f32()),
                _ => None,
            })
            .sum();
        if elapsed > 0.0 {
            for cooldown in &mut self.cooldowns {
                *cooldown = (*cooldown - elapsed).max(0.0);
            }
        }

        if !control.firing {
            return;
        }
        let Some(target) = control.target else {
            return;
        };

        self.scratch.clear();
        for cell in ship.cells().iter().filter(|cell| cell.is_weapon()) {
            let slot = cell.id.index();
            if self.cooldowns[slot] > 0.0 {
                continue;
            }

            let origin = player + layout.axial_to_pixel(cell.coord);
            let Some(direction) = (target - origin).try_normalize() else {
                continue;
            };
            let aim = direction.y.atan2(direction.x);

            let profile = self.profile(&synergies.cell(cell.id), synergies.stats());
            let half_span = (profile.count as f32 - 1.0) * 0.5;
            for index in 0..profile.count {
                let offset = (index as f32 - half_span) * self.config.spread;
                self.scratch.push(Command::FireProjectile {
                    source: cell.id,
                    origin,
                    heading: aim + offset,
                    spec: profile.spec,
                });
            }
            self.cooldowns[slot] = profile.interval;
        }

        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_weapon_fires_single_base_projectile() {
        let weapons = Weapons::new(Config::default());
        let profile = weapons.profile(&CellSynergies::default(), &SynergyStats::default());
        assert_eq!(profile.count, 1);
        assert!((profile.interval - 0.8).abs() < 1e-6);
        assert!((profile.spec.damage - 10.0).abs() < 1e-6);
        assert!(profile.spec.homing.is_none());
        assert!(profile.spec.growth.is_none());
    }

    #[test]
    fn unknown_cells_are_ready() {
        let weapons = Weapons::new(Config::default());
        assert_eq!(weapons.cooldown(CellId::new(12)), 0.0);
    }
}
