#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven orchestration of the Hexbound world and its systems.
//!
//! A [`Session`] owns the world, the synergy resolver and every system. Each
//! call to [`Session::tick`] samples one [`FrameInput`], applies buffered ship
//! mutations, advances the clock and runs the systems in a fixed order,
//! feeding their commands back through [`hexbound_world::apply`].

use std::{collections::VecDeque, time::Duration};

use glam::Vec2;
use hexbound_core::{
    CellColor, Command, EnemySnapshot, Event, HexCoord, ModuleChoice, PickupSnapshot, PlayMode,
    ProjectileSnapshot, ShipCell, Viewport,
};
use hexbound_system_collision::{self as collision, Collision};
use hexbound_system_fields::{self as fields, Fields};
use hexbound_system_progression::{self as progression, Progression};
use hexbound_system_synergy::{SynergyResolver, SynergyStats, UltimateKind};
use hexbound_system_waves::{self as waves, WaveDirector};
use hexbound_system_weapons::{self as weapons, FireControl, Weapons};
use hexbound_world::{self as world, query, World};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Aggregated configuration of the world and every system.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// World parameters.
    pub world: world::Config,
    /// Weapon base stats.
    pub weapons: weapons::Config,
    /// Wave pacing.
    pub waves: waves::Config,
    /// Collision radii.
    pub collision: collision::Config,
    /// Shockwave tuning.
    pub fields: fields::Config,
    /// Level-up offers.
    pub progression: progression::Config,
    /// Half size of the camera viewport centered on the player.
    pub viewport_half_extents: Vec2,
}

impl SessionConfig {
    /// Default configuration with every random stream derived from `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            waves: waves::Config::new(seed),
            progression: progression::Config::new(seed.rotate_left(32) ^ 0x9e37_79b9_7f4a_7c15),
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            world: world::Config::default(),
            weapons: weapons::Config::default(),
            waves: waves::Config::default(),
            collision: collision::Config::default(),
            fields: fields::Config::default(),
            progression: progression::Config::default(),
            viewport_half_extents: Vec2::new(640.0, 360.0),
        }
    }
}

/// Where the weapons point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum AimTarget {
    /// A fixed world-space point.
    Position(Vec2),
    /// The live enemy closest to the player.
    #[default]
    NearestEnemy,
}

/// Input sampled once at the start of each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Desired movement direction; longer vectors are clamped to unit length.
    pub movement: Vec2,
    /// Aim of every weapon.
    pub aim: AimTarget,
    /// Whether fire is held.
    pub fire: bool,
}

/// Ship changes requested outside the tick, applied at the start of the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipMutation {
    /// Attaches a module directly.
    Attach {
        /// Empty coordinate adjacent to the ship.
        coord: HexCoord,
        /// Color of the module.
        color: CellColor,
    },
    /// Accepts a choice of the pending level-up offer.
    SelectOffer {
        /// Position of the choice within the offer.
        index: usize,
    },
}

/// Final statistics of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Score accumulated from kills.
    pub score: u64,
    /// Wave in progress when the core fell.
    pub wave: u32,
    /// Level reached.
    pub level: u32,
    /// Simulated seconds survived.
    pub elapsed_secs: f64,
    /// Ultimates active at the end of the run.
    pub ultimates: Vec<UltimateKind>,
}

/// Events that end the session, reported exactly once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TerminalEvent {
    /// The core was destroyed.
    RunEnded(RunSummary),
}

/// Read-only picture of the session for presentation.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    /// Current play mode.
    pub play_mode: PlayMode,
    /// World-space position of the core.
    pub player: Vec2,
    /// Ship cells in identifier order.
    pub ship: Vec<ShipCell>,
    /// Live enemies in identifier order.
    pub enemies: Vec<EnemySnapshot>,
    /// Live projectiles in identifier order.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Uncollected pickups in identifier order.
    pub pickups: Vec<PickupSnapshot>,
    /// Wave in progress.
    pub wave: u32,
    /// Score accumulated from kills.
    pub score: u64,
    /// Current level.
    pub level: u32,
    /// Experience toward the next level.
    pub experience: u32,
    /// Health of the core.
    pub core_health: f32,
    /// Offer awaiting a decision.
    pub pending_offer: Option<Vec<ModuleChoice>>,
    /// Synergies of the current ship.
    pub stats: SynergyStats,
}

/// Owns the world and drives every system once per frame.
#[derive(Debug)]
pub struct Session {
    viewport_half_extents: Vec2,
    world: World,
    resolver: SynergyResolver,
    stats: SynergyStats,
    configured_version: Option<u64>,
    weapons: Weapons,
    waves: WaveDirector,
    fields: Fields,
    collision: Collision,
    progression: Progression,
    pending: VecDeque<ShipMutation>,
    carried: Vec<Event>,
    events: Vec<Event>,
    commands: Vec<Command>,
    ended: bool,
}

impl Session {
    /// Creates a session from the provided configuration.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            viewport_half_extents: config.viewport_half_extents,
            world: World::with_config(config.world),
            resolver: SynergyResolver::new(),
            stats: SynergyStats::default(),
            configured_version: None,
            weapons: Weapons::new(config.weapons),
            waves: WaveDirector::new(config.waves),
            fields: Fields::new(config.fields),
            collision: Collision::new(config.collision),
            progression: Progression::new(config.progression),
            pending: VecDeque::new(),
            carried: Vec::new(),
            events: Vec::new(),
            commands: Vec::new(),
            ended: false,
        }
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events produced by the most recent tick.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.events
    }

    /// Whether the run has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.ended
    }

    /// Buffers a ship mutation until the start of the next tick.
    pub fn queue_mutation(&mut self, mutation: ShipMutation) {
        self.pending.push_back(mutation);
    }

    /// Pauses or resumes the run. Resuming is refused while an offer is pending.
    ///
    /// Resulting events open the event stream of the next tick.
    pub fn set_paused(&mut self, paused: bool) {
        let mode = if paused {
            PlayMode::Paused
        } else {
            PlayMode::Running
        };
        world::apply(&mut self.world, Command::SetPlayMode { mode }, &mut self.carried);
    }

    /// Advances the session by `dt` using `input`.
    ///
    /// Returns the terminal event on the tick the run ends and `None` on
    /// every other tick, including all ticks after the end.
    pub fn tick(&mut self, input: FrameInput, dt: Duration) -> Option<TerminalEvent> {
        self.events.clear();
        self.events.append(&mut self.carried);

        while let Some(mutation) = self.pending.pop_front() {
            let command = match mutation {
                ShipMutation::Attach { coord, color } => Command::AttachCell { coord, color },
                ShipMutation::SelectOffer { index } => Command::SelectOffer { index },
            };
            world::apply(&mut self.world, command, &mut self.events);
        }
        for event in &self.events {
            match event {
                Event::AttachRejected { coord, reason } => {
                    debug!(q = coord.q(), r = coord.r(), %reason, "attach rejected");
                }
                Event::SelectionRejected { index, reason } => {
                    debug!(index, %reason, "selection rejected");
                }
                _ => {}
            }
        }
        self.resolver.handle(&self.events);
        self.refresh_synergies();

        world::apply(
            &mut self.world,
            Command::SteerPlayer {
                direction: input.movement,
            },
            &mut self.events,
        );
        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        let play_mode = query::play_mode(&self.world);
        let player = query::player_position(&self.world);
        let viewport = Viewport::new(player, self.viewport_half_extents);

        self.waves
            .handle(&self.events, play_mode, viewport, &mut self.commands);
        self.flush_commands();

        let enemies = query::enemy_view(&self.world);
        let target = match input.aim {
            AimTarget::Position(point) => Some(point),
            AimTarget::NearestEnemy => enemies.nearest(player).map(|enemy| enemy.position),
        };
        let resolution = self.resolver.resolve(&query::ship_view(&self.world));
        self.weapons.handle(
            &self.events,
            play_mode,
            &query::ship_view(&self.world),
            resolution,
            query::hex_layout(&self.world),
            player,
            FireControl {
                target,
                firing: input.fire,
            },
            &mut self.commands,
        );
        self.fields.handle(
            &self.events,
            play_mode,
            resolution.stats(),
            fields::Scene {
                ship: query::ship_view(&self.world),
                layout: query::hex_layout(&self.world),
                player,
                enemies: &enemies,
            },
            &mut self.commands,
        );
        self.flush_commands();

        let enemies = query::enemy_view(&self.world);
        let projectiles = query::projectile_view(&self.world);
        let pickups = query::pickup_view(&self.world);
        let collision_start = self.events.len();
        self.collision.handle(
            query::play_mode(&self.world),
            collision::Scene {
                ship: query::ship_view(&self.world),
                layout: query::hex_layout(&self.world),
                player,
                enemies: &enemies,
                projectiles: &projectiles,
                pickups: &pickups,
                magnet_bonus: self.stats.pickup_radius_bonus,
            },
            &mut self.commands,
        );
        self.flush_commands();

        let sites = query::attachment_sites(&self.world);
        self.progression
            .handle(&self.events[collision_start..], &sites, &mut self.commands);
        self.flush_commands();

        self.finish_if_destroyed()
    }

    /// Captures the state presentation needs.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            play_mode: query::play_mode(&self.world),
            player: query::player_position(&self.world),
            ship: query::ship_cells(&self.world).to_vec(),
            enemies: query::enemy_view(&self.world).into_vec(),
            projectiles: query::projectile_view(&self.world).into_vec(),
            pickups: query::pickup_view(&self.world).into_vec(),
            wave: query::wave(&self.world),
            score: query::score(&self.world),
            level: query::level(&self.world),
            experience: query::experience(&self.world),
            core_health: query::core_health(&self.world),
            pending_offer: query::pending_offer(&self.world).map(<[ModuleChoice]>::to_vec),
            stats: self.stats.clone(),
        }
    }

    /// Summary of the run so far.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: query::score(&self.world),
            wave: query::wave(&self.world),
            level: query::level(&self.world),
            elapsed_secs: query::elapsed(&self.world).as_secs_f64(),
            ultimates: self.stats.ultimates.clone(),
        }
    }

    /// Pushes updated modifiers to the world whenever the ship version moved.
    fn refresh_synergies(&mut self) {
        let resolution = self.resolver.resolve(&query::ship_view(&self.world));
        if self.configured_version == Some(resolution.version()) {
            return;
        }
        self.configured_version = Some(resolution.version());
        self.stats = resolution.stats().clone();
        debug!(
            version = resolution.version(),
            ultimates = ?self.stats.ultimates,
            "synergies resolved"
        );
        world::apply(
            &mut self.world,
            Command::ConfigureShipModifiers {
                modifiers: self.stats.ship_modifiers(),
            },
            &mut self.events,
        );
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn finish_if_destroyed(&mut self) -> Option<TerminalEvent> {
        if self.ended
            || !self
                .events
                .iter()
                .any(|event| matches!(event, Event::PlayerDestroyed))
        {
            return None;
        }
        self.ended = true;
        let summary = self.summary();
        info!(
            score = summary.score,
            wave = summary.wave,
            level = summary.level,
            elapsed_secs = summary.elapsed_secs,
            "run ended"
        );
        Some(TerminalEvent::RunEnded(summary))
    }
}
