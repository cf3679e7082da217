#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that detects overlaps and emits the commands resolving them.
//!
//! Four passes run per tick, each over views sorted by identifier so the
//! emitted commands are deterministic: projectile against enemy, enemy
//! against hull cell, enemy against enemy, and pickup against player.

use glam::Vec2;
use hexbound_core::{
    CellId, Command, EnemySnapshot, EnemyView, HexLayout, PickupView, PlayMode, ProjectileView,
    ShipView,
};

/// Tunable radii of the pickup passes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Distance from the player at which pickups are collected.
    pub collect_radius: f32,
    /// Distance from the player at which pickups start drifting in.
    pub magnet_radius: f32,
    /// Speed of attracted pickups in world units per second.
    pub magnet_speed: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            collect_radius: 24.0,
            magnet_radius: 120.0,
            magnet_speed: 320.0,
        }
    }
}

/// Read-only state the collision passes inspect.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    /// Ship cells and their coordinates.
    pub ship: ShipView<'a>,
    /// Layout mapping ship coordinates to offsets from the player.
    pub layout: HexLayout,
    /// World-space position of the core.
    pub player: Vec2,
    /// Live enemies.
    pub enemies: &'a EnemyView,
    /// Live projectiles.
    pub projectiles: &'a ProjectileView,
    /// Uncollected pickups.
    pub pickups: &'a PickupView,
    /// Extra magnet radius granted by synergies.
    pub magnet_bonus: f32,
}

/// Collision system reusing its scratch buffers between ticks.
#[derive(Debug)]
pub struct Collision {
    config: Config,
    enemies: Vec<EnemySnapshot>,
    cells: Vec<(CellId, Vec2)>,
}

impl Collision {
    /// Creates a collision system from the provided radii.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            enemies: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Emits commands for every overlap found in `scene`.
    pub fn handle(&mut self, play_mode: PlayMode, scene: Scene<'_>, out: &mut Vec<Command>) {
        if play_mode != PlayMode::Running {
            return;
        }

        self.enemies.clear();
        self.enemies.extend(scene.enemies.iter().copied());

        self.cells.clear();
        self.cells.extend(
            scene
                .ship
                .cells()
                .iter()
                .map(|cell| (cell.id, scene.player + scene.layout.axial_to_pixel(cell.coord))),
        );

        self.projectile_hits(scene.projectiles, out);
        self.hull_contacts(scene.layout.radius(), out);
        self.separation(out);
        self.pickups(&scene, out);
    }

    fn projectile_hits(&self, projectiles: &ProjectileView, out: &mut Vec<Command>) {
        for projectile in projectiles.iter() {
            for enemy in &self.enemies {
                let reach = projectile.size + enemy.radius;
                if projectile.position.distance_squared(enemy.position) > reach * reach {
                    continue;
                }
                out.push(Command::ResolveHit {
                    projectile: projectile.id,
                    enemy: enemy.id,
                });
                if !projectile.piercing {
                    break;
                }
            }
        }
    }

    fn hull_contacts(&self, hex_radius: f32, out: &mut Vec<Command>) {
        for enemy in self.enemies.iter().filter(|enemy| enemy.contact_ready) {
            let reach = hex_radius + enemy.radius;
            let touched = self
                .cells
                .iter()
                .map(|(cell, center)| (*cell, center.distance_squared(enemy.position)))
                .filter(|(_, distance)| *distance <= reach * reach)
                .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
            if let Some((cell, _)) = touched {
                out.push(Command::ContactHull {
                    enemy: enemy.id,
                    cell,
                });
            }
        }
    }

    fn separation(&self, out: &mut Vec<Command>) {
        for (index, first) in self.enemies.iter().enumerate() {
            for second in &self.enemies[index + 1..] {
                let delta = second.position - first.position;
                let distance = delta.length();
                let overlap = first.radius + second.radius - distance;
                if overlap <= 0.0 || distance <= f32::EPSILON {
                    continue;
                }
                let push = delta / distance * (overlap * 0.5);
                out.push(Command::NudgeEnemy {
                    enemy: first.id,
                    offset: -push,
                });
                out.push(Command::NudgeEnemy {
                    enemy: second.id,
                    offset: push,
                });
            }
        }
    }

    fn pickups(&self, scene: &Scene<'_>, out: &mut Vec<Command>) {
        let magnet = self.config.magnet_radius + scene.magnet_bonus;
        for pickup in scene.pickups.iter() {
            let delta = scene.player - pickup.position;
            let distance = delta.length();
            if distance <= self.config.collect_radius {
                out.push(Command::CollectPickup { pickup: pickup.id });
            } else if distance <= magnet {
                out.push(Command::AttractPickup {
                    pickup: pickup.id,
                    velocity: delta / distance * self.config.magnet_speed,
                });
            }
        }
    }
}
