#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system projecting the ship's status fields onto nearby enemies.

use std::time::Duration;

use glam::Vec2;
use hexbound_core::{Command, EnemyView, Event, HexLayout, PlayMode, ShipView, StatusEffect};
use hexbound_system_synergy::SynergyStats;

/// Shockwave cadence and reach.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Time between shockwave pulses.
    pub shockwave_interval: Duration,
    /// Reach of a pulse around the emitting cell.
    pub shockwave_radius: f32,
    /// Initial push speed of a pulse.
    pub shockwave_strength: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shockwave_interval: Duration::from_secs(4),
            shockwave_radius: 160.0,
            shockwave_strength: 380.0,
        }
    }
}

/// Read-only state the fields inspect.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    /// Ship cells, used to locate the shockwave emitter.
    pub ship: ShipView<'a>,
    /// Layout mapping ship coordinates to offsets from the player.
    pub layout: HexLayout,
    /// World-space position of the core.
    pub player: Vec2,
    /// Live enemies.
    pub enemies: &'a EnemyView,
}

/// Field system holding the shockwave timer.
#[derive(Debug)]
pub struct Fields {
    config: Config,
    shockwave_accumulator: Duration,
}

impl Fields {
    /// Creates the field system with a fresh shockwave timer.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            shockwave_accumulator: Duration::ZERO,
        }
    }

    /// Emits `Command::ApplyStatus` for every enemy inside an active field.
    pub fn handle(
        &mut self,
        events: &[Event],
        play_mode: PlayMode,
        stats: &SynergyStats,
        scene: Scene<'_>,
        out: &mut Vec<Command>,
    ) {
        if play_mode != PlayMode::Running {
            return;
        }

        if let Some(field) = stats.stun_field {
            for enemy in scene.enemies.iter() {
                if enemy.stunned || enemy.kind.is_boss() {
                    continue;
                }
                if enemy.position.distance(scene.player) <= field.radius + enemy.radius {
                    out.push(Command::ApplyStatus {
                        enemy: enemy.id,
                        effect: StatusEffect::Stun {
                            duration: field.duration,
                        },
                    });
                }
            }
        }

        if let Some(field) = stats.slow_field {
            for enemy in scene.enemies.iter() {
                if enemy.kind.is_boss() {
                    continue;
                }
                if enemy.position.distance(scene.player) <= field.radius + enemy.radius {
                    out.push(Command::ApplyStatus {
                        enemy: enemy.id,
                        effect: StatusEffect::Slow {
                            percent: field.percent,
                            duration: field.duration,
                        },
                    });
                }
            }
        }

        let emitter = stats
            .shockwave_emitter
            .and_then(|cell| scene.ship.get(cell))
            .map(|cell| scene.player + scene.layout.axial_to_pixel(cell.coord));
        let Some(origin) = emitter else {
            self.shockwave_accumulator = Duration::ZERO;
            return;
        };
        if self.config.shockwave_interval.is_zero() {
            return;
        }

        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.shockwave_accumulator = self.shockwave_accumulator.saturating_add(*dt);
            }
        }
        let mut pulses = 0;
        while self.shockwave_accumulator >= self.config.shockwave_interval {
            self.shockwave_accumulator -= self.config.shockwave_interval;
            pulses += 1;
        }
        if pulses == 0 {
            return;
        }

        for enemy in scene.enemies.iter() {
            if enemy.kind.is_boss() {
                continue;
            }
            let offset = enemy.position - origin;
            if offset.length() > self.config.shockwave_radius + enemy.radius {
                continue;
            }
            out.push(Command::ApplyStatus {
                enemy: enemy.id,
                effect: StatusEffect::Knockback {
                    direction: offset,
                    strength: self.config.shockwave_strength,
                },
            });
        }
    }
}
