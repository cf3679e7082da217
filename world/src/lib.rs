#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Hexbound.

pub mod enemies;
mod projectiles;
mod ship;

use std::{collections::VecDeque, time::Duration};

use glam::Vec2;
use hexbound_core::{
    AttachError, CellColor, CellId, Command, EnemyId, Event, HexLayout, ModuleChoice, PickupId,
    PlayMode, ProjectileId, SelectionError, ShipModifiers, StatusEffect,
};
use tracing::{debug, info};

use crate::{
    enemies::{CombatEntity, DeathRecord},
    projectiles::Projectile,
    ship::Ship,
};

/// Speed of a heavy-impact knockback in world units per second.
const HEAVY_KNOCKBACK_STRENGTH: f32 = 260.0;

/// Tunable parameters of the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Color of the core cell.
    pub core_color: CellColor,
    /// Distance from the hex center to a corner, in world units.
    pub hex_radius: f32,
    /// Half the side length of the square arena centered on the origin.
    pub arena_half_extent: f32,
    /// Player speed in world units per second before modifiers.
    pub player_speed: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            core_color: CellColor::Red,
            hex_radius: 18.0,
            arena_half_extent: 4_000.0,
            player_speed: 180.0,
        }
    }
}

#[derive(Clone, Debug)]
struct Pickup {
    id: PickupId,
    position: Vec2,
    velocity: Vec2,
    value: u32,
}

#[derive(Clone, Debug)]
struct Player {
    position: Vec2,
    steering: Vec2,
    level: u32,
    experience: u32,
    score: u64,
}

/// Represents the authoritative Hexbound world state.
#[derive(Debug)]
pub struct World {
    config: Config,
    layout: HexLayout,
    play_mode: PlayMode,
    ship: Ship,
    modifiers: ShipModifiers,
    player: Player,
    enemies: Vec<CombatEntity>,
    projectiles: Vec<Projectile>,
    pickups: Vec<Pickup>,
    offers: VecDeque<Vec<ModuleChoice>>,
    resume_after_offers: bool,
    wave: u32,
    tick_index: u64,
    elapsed: Duration,
    next_enemy_id: u32,
    next_projectile_id: u32,
    next_pickup_id: u32,
}

impl World {
    /// Creates a new world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a new world from the provided configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            layout: HexLayout::new(config.hex_radius),
            play_mode: PlayMode::Running,
            ship: Ship::new(config.core_color),
            modifiers: ShipModifiers::default(),
            player: Player {
                position: Vec2::ZERO,
                steering: Vec2::ZERO,
                level: 1,
                experience: 0,
                score: 0,
            },
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            offers: VecDeque::new(),
            resume_after_offers: false,
            wave: 0,
            tick_index: 0,
            elapsed: Duration::ZERO,
            next_enemy_id: 0,
            next_projectile_id: 0,
            next_pickup_id: 0,
            config,
        }
    }

    fn set_play_mode(&mut self, mode: PlayMode, out_events: &mut Vec<Event>) {
        if self.play_mode == mode || self.play_mode == PlayMode::GameOver {
            return;
        }
        self.play_mode = mode;
        out_events.push(Event::PlayModeChanged { mode });
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        let secs = dt.as_secs_f32();
        let bound = self.config.arena_half_extent;
        let speed = self.config.player_speed * self.modifiers.move_speed_multiplier;
        let moved = self.player.position + self.player.steering * speed * secs;
        self.player.position = moved.clamp(Vec2::splat(-bound), Vec2::splat(bound));

        self.ship.regenerate(self.modifiers.hull_regen_per_sec * secs);

        let target = self.player.position;
        for enemy in &mut self.enemies {
            enemy.advance(target, secs);
        }

        let enemies = &self.enemies;
        let mut removed = Vec::new();
        self.projectiles.retain_mut(|projectile| {
            let nearest = nearest_enemy(enemies, projectile.position());
            let alive = projectile.advance(secs, nearest);
            let position = projectile.position();
            let inside = position.x.abs() <= bound && position.y.abs() <= bound;
            if !(alive && inside) {
                removed.push(projectile.id());
            }
            alive && inside
        });
        for projectile in removed {
            out_events.push(Event::ProjectileRemoved { projectile });
        }

        // Attraction lasts a single tick; collision renews it while in range.
        for pickup in &mut self.pickups {
            pickup.position += pickup.velocity * secs;
            pickup.velocity = Vec2::ZERO;
        }
    }

    fn attach(&mut self, choice: ModuleChoice, out_events: &mut Vec<Event>) -> Result<(), AttachError> {
        if self.play_mode == PlayMode::GameOver {
            return Err(AttachError::RunEnded);
        }
        let cell = self.ship.attach(choice.coord, choice.color)?;
        debug!(
            cell = cell.get(),
            q = choice.coord.q(),
            r = choice.coord.r(),
            color = ?choice.color,
            version = self.ship.version(),
            "module attached"
        );
        out_events.push(Event::ShipChanged {
            version: self.ship.version(),
            cell,
            coord: choice.coord,
        });
        Ok(())
    }

    fn select_offer(&mut self, index: usize, out_events: &mut Vec<Event>) -> Result<(), SelectionError> {
        let choice = {
            let offer = self.offers.front().ok_or(SelectionError::NoOfferPending)?;
            *offer.get(index).ok_or(SelectionError::OutOfRange {
                index,
                len: offer.len(),
            })?
        };
        self.attach(choice, out_events)
            .map_err(SelectionError::Attach)?;
        let _ = self.offers.pop_front();
        self.present_next_offer(out_events);
        Ok(())
    }

    /// Presents the next queued offer, dropping choices whose site has been
    /// taken since it was generated. Once no offer remains, play resumes
    /// unless the player paused while choosing.
    fn present_next_offer(&mut self, out_events: &mut Vec<Event>) {
        while let Some(front) = self.offers.front_mut() {
            front.retain(|choice| self.ship.can_attach(choice.coord));
            if front.is_empty() {
                let _ = self.offers.pop_front();
                continue;
            }
            out_events.push(Event::OfferPresented {
                choices: front.clone(),
            });
            return;
        }
        if std::mem::take(&mut self.resume_after_offers) {
            self.set_play_mode(PlayMode::Running, out_events);
        }
    }

    fn enemy_mut(&mut self, enemy: EnemyId) -> Option<&mut CombatEntity> {
        self.enemies.iter_mut().find(|entity| entity.id() == enemy)
    }

    fn resolve_hit(&mut self, projectile: ProjectileId, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(p_index) = self.projectiles.iter().position(|p| p.id() == projectile) else {
            return;
        };
        let Some(e_index) = self.enemies.iter().position(|e| e.id() == enemy) else {
            return;
        };
        if !self.enemies[e_index].is_alive() {
            return;
        }
        if !self.projectiles[p_index].register_hit(enemy) {
            return;
        }

        let damage = self.projectiles[p_index].damage();
        let heading = self.projectiles[p_index].heading();
        let spec = *self.projectiles[p_index].spec();

        let target = &mut self.enemies[e_index];
        let mut death = None;
        let dealt = target.apply_damage(damage, |record| death = Some(record));
        if spec.heavy {
            let _ = target.apply_knockback(Vec2::from_angle(heading), HEAVY_KNOCKBACK_STRENGTH);
        }
        if spec.corrosive {
            target.apply_corrosion();
        }
        if spec.entropic {
            target.add_entropy(1);
        }
        out_events.push(Event::EnemyDamaged {
            enemy,
            amount: dealt,
            remaining: target.hp(),
        });

        if !spec.piercing {
            let _ = self.projectiles.remove(p_index);
            out_events.push(Event::ProjectileRemoved { projectile });
        }
        if let Some(record) = death {
            self.handle_death(record, out_events);
        }
    }

    fn resolve_contact(&mut self, enemy: EnemyId, cell: CellId, out_events: &mut Vec<Event>) {
        if self.play_mode != PlayMode::Running {
            return;
        }
        let thorns = self.modifiers.thorns_damage;
        let multiplier = self.modifiers.damage_taken_multiplier;
        let Some(entity) = self.enemy_mut(enemy) else {
            return;
        };
        let Some(damage) = entity.try_contact() else {
            return;
        };

        let mut death = None;
        if thorns > 0.0 {
            let dealt = entity.apply_damage(thorns, |record| death = Some(record));
            let remaining = entity.hp();
            out_events.push(Event::EnemyDamaged {
                enemy,
                amount: dealt,
                remaining,
            });
        }

        let amount = damage * multiplier;
        if let Some(core_remaining) = self.ship.damage(cell, amount) {
            out_events.push(Event::HullDamaged {
                cell,
                amount,
                core_remaining,
            });
            if core_remaining <= 0.0 {
                info!(
                    wave = self.wave,
                    level = self.player.level,
                    score = self.player.score,
                    "core destroyed"
                );
                self.set_play_mode(PlayMode::GameOver, out_events);
                out_events.push(Event::PlayerDestroyed);
            }
        }

        if let Some(record) = death {
            self.handle_death(record, out_events);
        }
    }

    fn handle_death(&mut self, record: DeathRecord, out_events: &mut Vec<Event>) {
        self.enemies.retain(|entity| entity.id() != record.id);
        let stats = record.kind.base_stats();
        self.player.score = self.player.score.saturating_add(u64::from(stats.score));
        out_events.push(Event::EnemyDied {
            enemy: record.id,
            kind: record.kind,
            position: record.position,
        });

        let pickup = PickupId::new(self.next_pickup_id);
        self.next_pickup_id = self.next_pickup_id.wrapping_add(1);
        self.pickups.push(Pickup {
            id: pickup,
            position: record.position,
            velocity: Vec2::ZERO,
            value: stats.experience,
        });
        out_events.push(Event::PickupDropped {
            pickup,
            value: stats.experience,
        });
    }

    fn collect(&mut self, pickup: PickupId, out_events: &mut Vec<Event>) {
        let Some(index) = self.pickups.iter().position(|entry| entry.id == pickup) else {
            return;
        };
        let collected = self.pickups.remove(index);
        self.player.experience = self.player.experience.saturating_add(collected.value);
        out_events.push(Event::PickupCollected {
            pickup,
            value: collected.value,
        });

        loop {
            let threshold = experience_for_level(self.player.level);
            if self.player.experience < threshold {
                break;
            }
            self.player.experience -= threshold;
            self.player.level += 1;
            info!(level = self.player.level, "level reached");
            out_events.push(Event::LevelReached {
                level: self.player.level,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Experience needed to advance past `level`.
#[must_use]
pub fn experience_for_level(level: u32) -> u32 {
    10 + 5 * level.saturating_sub(1)
}

fn nearest_enemy(enemies: &[CombatEntity], point: Vec2) -> Option<Vec2> {
    enemies
        .iter()
        .filter(|enemy| enemy.is_alive())
        .map(CombatEntity::position)
        .min_by(|a, b| a.distance_squared(point).total_cmp(&b.distance_squared(point)))
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            if world.play_mode == PlayMode::Running {
                world.advance(dt, out_events);
            }
        }
        Command::SetPlayMode { mode } => {
            if !world.offers.is_empty() {
                world.resume_after_offers = mode == PlayMode::Running;
                if mode == PlayMode::Running {
                    return;
                }
            }
            world.set_play_mode(mode, out_events);
        }
        Command::SteerPlayer { direction } => {
            world.player.steering = if direction.is_finite() {
                direction.clamp_length_max(1.0)
            } else {
                Vec2::ZERO
            };
        }
        Command::AttachCell { coord, color } => {
            if let Err(reason) = world.attach(ModuleChoice { coord, color }, out_events) {
                out_events.push(Event::AttachRejected { coord, reason });
            }
        }
        Command::OfferModules { choices } => {
            if choices.is_empty() || world.play_mode == PlayMode::GameOver {
                return;
            }
            world.offers.push_back(choices);
            if world.offers.len() == 1 {
                world.present_next_offer(out_events);
                if !world.offers.is_empty() {
                    world.resume_after_offers = world.play_mode == PlayMode::Running;
                    world.set_play_mode(PlayMode::Paused, out_events);
                }
            }
        }
        Command::SelectOffer { index } => {
            if let Err(reason) = world.select_offer(index, out_events) {
                out_events.push(Event::SelectionRejected { index, reason });
            }
        }
        Command::ConfigureShipModifiers { modifiers } => {
            world.modifiers = modifiers;
            world.ship.set_core_bonus(modifiers.max_health_bonus);
        }
        Command::BeginWave { wave } => {
            world.wave = wave;
            info!(wave, "wave started");
            out_events.push(Event::WaveStarted { wave });
        }
        Command::SpawnEnemy {
            kind,
            position,
            scaling,
        } => {
            let enemy = EnemyId::new(world.next_enemy_id);
            world.next_enemy_id = world.next_enemy_id.wrapping_add(1);
            world
                .enemies
                .push(CombatEntity::spawn(enemy, kind, position, scaling));
            if kind.is_boss() {
                info!(enemy = enemy.get(), kind = ?kind, "boss spawned");
            }
            out_events.push(Event::EnemySpawned {
                enemy,
                kind,
                position,
            });
        }
        Command::FireProjectile {
            source,
            origin,
            heading,
            spec,
        } => {
            let projectile = ProjectileId::new(world.next_projectile_id);
            world.next_projectile_id = world.next_projectile_id.wrapping_add(1);
            world
                .projectiles
                .push(Projectile::new(projectile, origin, heading, spec));
            out_events.push(Event::ProjectileFired { projectile, source });
        }
        Command::ResolveHit { projectile, enemy } => {
            world.resolve_hit(projectile, enemy, out_events);
        }
        Command::ContactHull { enemy, cell } => {
            world.resolve_contact(enemy, cell, out_events);
        }
        Command::NudgeEnemy { enemy, offset } => {
            if let Some(entity) = world.enemy_mut(enemy) {
                entity.nudge(offset);
            }
        }
        Command::ApplyStatus { enemy, effect } => {
            let Some(entity) = world.enemy_mut(enemy) else {
                return;
            };
            match effect {
                StatusEffect::Slow { percent, duration } => {
                    let _ = entity.apply_slow(percent, duration);
                }
                StatusEffect::Stun { duration } => {
                    let _ = entity.apply_stun(duration);
                }
                StatusEffect::Knockback {
                    direction,
                    strength,
                } => {
                    let _ = entity.apply_knockback(direction, strength);
                }
                StatusEffect::Corrosion => entity.apply_corrosion(),
                StatusEffect::Entropy { stacks } => entity.add_entropy(stacks),
            }
        }
        Command::AttractPickup { pickup, velocity } => {
            if let Some(entry) = world.pickups.iter_mut().find(|entry| entry.id == pickup) {
                entry.velocity = velocity;
            }
        }
        Command::CollectPickup { pickup } => {
            world.collect(pickup, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use hexbound_core::{
        EnemyView, HexCoord, HexLayout, ModuleChoice, PickupSnapshot, PickupView, PlayMode,
        ProjectileView, ShipCell, ShipModifiers, ShipView,
    };

    use super::{experience_for_level, World};
    use crate::enemies::CombatEntity;

    /// Current play mode.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.play_mode
    }

    /// Read-only view of the ship.
    #[must_use]
    pub fn ship_view(world: &World) -> ShipView<'_> {
        world.ship.view()
    }

    /// Cells of the ship ordered by identifier.
    #[must_use]
    pub fn ship_cells(world: &World) -> &[ShipCell] {
        world.ship.cells()
    }

    /// Version counter of the ship, advanced by every mutation.
    #[must_use]
    pub fn ship_version(world: &World) -> u64 {
        world.ship.version()
    }

    /// Empty coordinates where a module could be attached, sorted.
    #[must_use]
    pub fn attachment_sites(world: &World) -> Vec<HexCoord> {
        world.ship.attachment_sites()
    }

    /// Health of the core cell.
    #[must_use]
    pub fn core_health(world: &World) -> f32 {
        world.ship.core_health()
    }

    /// Modifiers most recently configured on the ship.
    #[must_use]
    pub fn ship_modifiers(world: &World) -> ShipModifiers {
        world.modifiers
    }

    /// Layout converting ship coordinates to world space.
    #[must_use]
    pub fn hex_layout(world: &World) -> HexLayout {
        world.layout
    }

    /// World-space position of the player, which is the center of the core cell.
    #[must_use]
    pub fn player_position(world: &World) -> Vec2 {
        world.player.position
    }

    /// World-space center of the ship cell at `coord`.
    #[must_use]
    pub fn cell_position(world: &World, coord: HexCoord) -> Vec2 {
        world.player.position + world.layout.axial_to_pixel(coord)
    }

    /// Current level of the player.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.player.level
    }

    /// Experience accumulated toward the next level.
    #[must_use]
    pub fn experience(world: &World) -> u32 {
        world.player.experience
    }

    /// Experience required to leave the current level.
    #[must_use]
    pub fn experience_to_next_level(world: &World) -> u32 {
        experience_for_level(world.player.level)
    }

    /// Score accumulated from kills.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.player.score
    }

    /// Most recently started wave; zero before the first.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Simulated time elapsed while running.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Number of ticks processed while running.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Offer currently awaiting the player's decision.
    #[must_use]
    pub fn pending_offer(world: &World) -> Option<&[ModuleChoice]> {
        world.offers.front().map(Vec::as_slice)
    }

    /// Live enemies in identifier order.
    #[must_use]
    pub fn enemies(world: &World) -> &[CombatEntity] {
        &world.enemies
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(CombatEntity::snapshot).collect())
    }

    /// Captures a read-only view of the live projectiles.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Captures a read-only view of the uncollected pickups.
    #[must_use]
    pub fn pickup_view(world: &World) -> PickupView {
        PickupView::from_snapshots(
            world
                .pickups
                .iter()
                .map(|pickup| PickupSnapshot {
                    id: pickup.id,
                    position: pickup.position,
                    value: pickup.value,
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexbound_core::{EnemyKind, EnemyScaling, HexCoord, ProjectileSpec};

    fn spawn(world: &mut World, kind: EnemyKind, position: Vec2) -> EnemyId {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnEnemy {
                kind,
                position,
                scaling: EnemyScaling::default(),
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::EnemySpawned { enemy, .. }] => *enemy,
            other => panic!("unexpected events: {other:?}"),
        }
    }

    fn fire(world: &mut World, origin: Vec2, spec: ProjectileSpec) -> ProjectileId {
        let mut events = Vec::new();
        apply(
            world,
            Command::FireProjectile {
                source: CellId::new(0),
                origin,
                heading: 0.0,
                spec,
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::ProjectileFired { projectile, .. }] => *projectile,
            other => panic!("unexpected events: {other:?}"),
        }
    }

    fn bolt(damage: f32, piercing: bool) -> ProjectileSpec {
        ProjectileSpec {
            damage,
            speed: 100.0,
            size: 4.0,
            lifetime: 2.0,
            piercing,
            homing: None,
            heavy: false,
            growth: None,
            corrosive: false,
            entropic: false,
        }
    }

    #[test]
    fn attach_emits_ship_changed_with_new_version() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::AttachCell {
                coord: HexCoord::new(1, 0),
                color: CellColor::Blue,
            },
            &mut events,
        );
        assert!(matches!(
            events.as_slice(),
            [Event::ShipChanged { version: 1, .. }]
        ));
        assert_eq!(query::ship_version(&world), 1);
    }

    #[test]
    fn detached_attach_is_rejected_without_version_change() {
        let mut world = World::new();
        let mut events = Vec::new();
        let coord = HexCoord::new(3, 0);
        apply(
            &mut world,
            Command::AttachCell {
                coord,
                color: CellColor::Blue,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::AttachRejected {
                coord,
                reason: AttachError::NotAdjacent(coord),
            }]
        );
        assert_eq!(query::ship_version(&world), 0);
    }

    #[test]
    fn paused_world_ignores_ticks() {
        let mut world = World::new();
        let enemy = spawn(&mut world, EnemyKind::Grunt, Vec2::new(200.0, 0.0));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetPlayMode {
                mode: PlayMode::Paused,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::PlayModeChanged {
                mode: PlayMode::Paused
            }]
        );
        let entity = query::enemies(&world)
            .iter()
            .find(|entity| entity.id() == enemy)
            .expect("enemy");
        assert_eq!(entity.position(), Vec2::new(200.0, 0.0));
        assert_eq!(query::elapsed(&world), Duration::ZERO);
    }

    #[test]
    fn pausing_preserves_enemy_velocity() {
        let mut world = World::new();
        let _ = spawn(&mut world, EnemyKind::Scout, Vec2::new(300.0, 0.0));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
            &mut events,
        );
        let before = query::enemies(&world)[0].velocity();
        apply(
            &mut world,
            Command::SetPlayMode {
                mode: PlayMode::Paused,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
            &mut events,
        );
        assert_eq!(query::enemies(&world)[0].velocity(), before);
    }

    #[test]
    fn non_piercing_projectile_is_consumed_by_first_hit() {
        let mut world = World::new();
        let first = spawn(&mut world, EnemyKind::Brute, Vec2::new(50.0, 0.0));
        let second = spawn(&mut world, EnemyKind::Brute, Vec2::new(55.0, 0.0));
        let projectile = fire(&mut world, Vec2::new(50.0, 0.0), bolt(10.0, false));

        let mut events = Vec::new();
        apply(&mut world, Command::ResolveHit { projectile, enemy: first }, &mut events);
        apply(&mut world, Command::ResolveHit { projectile, enemy: second }, &mut events);

        let damaged: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                Event::EnemyDamaged { enemy, .. } => Some(*enemy),
                _ => None,
            })
            .collect();
        assert_eq!(damaged, vec![first]);
        assert!(query::projectile_view(&world).iter().next().is_none());
    }

    #[test]
    fn piercing_projectile_strikes_each_enemy_once() {
        let mut world = World::new();
        let first = spawn(&mut world, EnemyKind::Brute, Vec2::new(50.0, 0.0));
        let second = spawn(&mut world, EnemyKind::Brute, Vec2::new(55.0, 0.0));
        let projectile = fire(&mut world, Vec2::new(50.0, 0.0), bolt(10.0, true));

        let mut events = Vec::new();
        for enemy in [first, second, first] {
            apply(&mut world, Command::ResolveHit { projectile, enemy }, &mut events);
        }

        let hits = events
            .iter()
            .filter(|event| matches!(event, Event::EnemyDamaged { .. }))
            .count();
        assert_eq!(hits, 2);
        assert_eq!(query::projectile_view(&world).iter().count(), 1);
    }

    fn damage_dealt(events: &[Event], target: EnemyId) -> Vec<f32> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::EnemyDamaged { enemy, amount, .. } if *enemy == target => Some(*amount),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn debuffing_bolts_amplify_only_later_hits() {
        let mut world = World::new();
        let enemy = spawn(&mut world, EnemyKind::Brute, Vec2::new(50.0, 0.0));
        let spec = ProjectileSpec {
            corrosive: true,
            entropic: true,
            ..bolt(10.0, false)
        };

        let mut events = Vec::new();
        for _ in 0..2 {
            let projectile = fire(&mut world, Vec2::new(50.0, 0.0), spec);
            apply(&mut world, Command::ResolveHit { projectile, enemy }, &mut events);
        }

        let dealt = damage_dealt(&events, enemy);
        assert_eq!(dealt.len(), 2);
        assert!((dealt[0] - 10.0).abs() < 1e-4);
        let amplified =
            10.0 * enemies::CORROSION_DAMAGE_MULTIPLIER + enemies::ENTROPY_DAMAGE_PER_STACK;
        assert!((dealt[1] - amplified).abs() < 1e-4);
        let status = query::enemies(&world)[0].status();
        assert!(status.is_corroded());
        assert_eq!(status.entropy_stacks(), 2);
    }

    #[test]
    fn heavy_bolts_knock_back_all_but_bosses() {
        let mut world = World::new();
        let grunt = spawn(&mut world, EnemyKind::Brute, Vec2::new(50.0, 0.0));
        let boss = spawn(&mut world, EnemyKind::Sentinel, Vec2::new(80.0, 0.0));
        let spec = ProjectileSpec {
            heavy: true,
            ..bolt(10.0, false)
        };

        let mut events = Vec::new();
        for enemy in [grunt, boss] {
            let projectile = fire(&mut world, Vec2::new(40.0, 0.0), spec);
            apply(&mut world, Command::ResolveHit { projectile, enemy }, &mut events);
        }

        let velocity = |id: EnemyId| {
            query::enemies(&world)
                .iter()
                .find(|entity| entity.id() == id)
                .map(CombatEntity::velocity)
                .expect("enemy alive")
        };
        assert!((velocity(grunt) - Vec2::X * HEAVY_KNOCKBACK_STRENGTH).length() < 1e-3);
        assert_eq!(velocity(boss), Vec2::ZERO);
        assert_eq!(damage_dealt(&events, boss), vec![10.0]);
    }

    #[test]
    fn lethal_hit_drops_experience_and_scores() {
        let mut world = World::new();
        let enemy = spawn(&mut world, EnemyKind::Scout, Vec2::new(50.0, 0.0));
        let projectile = fire(&mut world, Vec2::new(50.0, 0.0), bolt(500.0, false));

        let mut events = Vec::new();
        apply(&mut world, Command::ResolveHit { projectile, enemy }, &mut events);

        let deaths = events
            .iter()
            .filter(|event| matches!(event, Event::EnemyDied { .. }))
            .count();
        assert_eq!(deaths, 1);
        assert!(query::enemies(&world).is_empty());
        assert_eq!(query::score(&world), u64::from(EnemyKind::Scout.base_stats().score));
        assert_eq!(query::pickup_view(&world).iter().count(), 1);
    }

    #[test]
    fn collecting_enough_experience_levels_up() {
        let mut world = World::new();
        let mut events = Vec::new();
        for _ in 0..3 {
            let enemy = spawn(&mut world, EnemyKind::Brute, Vec2::new(50.0, 0.0));
            let projectile = fire(&mut world, Vec2::new(50.0, 0.0), bolt(1_000.0, false));
            apply(&mut world, Command::ResolveHit { projectile, enemy }, &mut events);
        }
        let pickups: Vec<_> = query::pickup_view(&world).into_vec();
        assert_eq!(pickups.len(), 3);

        events.clear();
        for pickup in pickups {
            apply(&mut world, Command::CollectPickup { pickup: pickup.id }, &mut events);
        }
        assert!(events.contains(&Event::LevelReached { level: 2 }));
        assert_eq!(query::level(&world), 2);
        assert_eq!(query::experience(&world), 2);
    }

    #[test]
    fn contact_damages_hull_and_respects_cooldown() {
        let mut world = World::new();
        let enemy = spawn(&mut world, EnemyKind::Grunt, Vec2::new(20.0, 0.0));
        let cell = CellId::new(0);

        let mut events = Vec::new();
        apply(&mut world, Command::ContactHull { enemy, cell }, &mut events);
        apply(&mut world, Command::ContactHull { enemy, cell }, &mut events);

        let hits = events
            .iter()
            .filter(|event| matches!(event, Event::HullDamaged { .. }))
            .count();
        assert_eq!(hits, 1);
        let expected = 100.0 - EnemyKind::Grunt.base_stats().contact_damage;
        assert!((query::core_health(&world) - expected).abs() < 1e-4);
    }

    #[test]
    fn destroyed_core_ends_the_run() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureShipModifiers {
                modifiers: ShipModifiers {
                    damage_taken_multiplier: 100.0,
                    ..ShipModifiers::default()
                },
            },
            &mut events,
        );
        let enemy = spawn(&mut world, EnemyKind::Grunt, Vec2::new(20.0, 0.0));
        apply(
            &mut world,
            Command::ContactHull {
                enemy,
                cell: CellId::new(0),
            },
            &mut events,
        );
        assert!(events.contains(&Event::PlayerDestroyed));
        assert_eq!(query::play_mode(&world), PlayMode::GameOver);

        events.clear();
        apply(
            &mut world,
            Command::AttachCell {
                coord: HexCoord::new(1, 0),
                color: CellColor::Red,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::AttachRejected {
                coord: HexCoord::new(1, 0),
                reason: AttachError::RunEnded,
            }]
        );
    }

    #[test]
    fn offers_pause_until_selected() {
        let mut world = World::new();
        let mut events = Vec::new();
        let choices = vec![
            ModuleChoice {
                coord: HexCoord::new(1, 0),
                color: CellColor::Yellow,
            },
            ModuleChoice {
                coord: HexCoord::new(0, 1),
                color: CellColor::Green,
            },
        ];
        apply(&mut world, Command::OfferModules { choices: choices.clone() }, &mut events);
        assert_eq!(query::play_mode(&world), PlayMode::Paused);
        assert_eq!(query::pending_offer(&world), Some(choices.as_slice()));

        events.clear();
        apply(&mut world, Command::SelectOffer { index: 5 }, &mut events);
        assert_eq!(
            events,
            vec![Event::SelectionRejected {
                index: 5,
                reason: SelectionError::OutOfRange { index: 5, len: 2 },
            }]
        );

        events.clear();
        apply(&mut world, Command::SelectOffer { index: 1 }, &mut events);
        assert!(matches!(events[0], Event::ShipChanged { version: 1, .. }));
        assert_eq!(query::play_mode(&world), PlayMode::Running);
        assert!(query::pending_offer(&world).is_none());
    }

    #[test]
    fn queued_offers_drop_taken_sites() {
        let mut world = World::new();
        let mut events = Vec::new();
        let site = ModuleChoice {
            coord: HexCoord::new(1, 0),
            color: CellColor::Blue,
        };
        let other = ModuleChoice {
            coord: HexCoord::new(-1, 0),
            color: CellColor::Blue,
        };
        apply(&mut world, Command::OfferModules { choices: vec![site] }, &mut events);
        apply(&mut world, Command::OfferModules { choices: vec![site, other] }, &mut events);

        events.clear();
        apply(&mut world, Command::SelectOffer { index: 0 }, &mut events);
        assert_eq!(query::pending_offer(&world), Some([other].as_slice()));
        assert_eq!(query::play_mode(&world), PlayMode::Paused);
    }

    #[test]
    fn running_cannot_resume_while_offer_pending() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::OfferModules {
                choices: vec![ModuleChoice {
                    coord: HexCoord::new(1, 0),
                    color: CellColor::Red,
                }],
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetPlayMode {
                mode: PlayMode::Running,
            },
            &mut events,
        );
        assert_eq!(query::play_mode(&world), PlayMode::Paused);
    }

    #[test]
    fn pause_taken_during_an_offer_survives_selection() {
        let choice = ModuleChoice {
            coord: HexCoord::new(1, 0),
            color: CellColor::Green,
        };
        let pause = Command::SetPlayMode {
            mode: PlayMode::Paused,
        };
        let mut events = Vec::new();

        let mut world = World::new();
        apply(&mut world, Command::OfferModules { choices: vec![choice] }, &mut events);
        apply(&mut world, pause.clone(), &mut events);
        apply(&mut world, Command::SelectOffer { index: 0 }, &mut events);
        assert_eq!(query::play_mode(&world), PlayMode::Paused);
        apply(
            &mut world,
            Command::SetPlayMode {
                mode: PlayMode::Running,
            },
            &mut events,
        );
        assert_eq!(query::play_mode(&world), PlayMode::Running);

        let mut world = World::new();
        apply(&mut world, pause, &mut events);
        apply(&mut world, Command::OfferModules { choices: vec![choice] }, &mut events);
        apply(&mut world, Command::SelectOffer { index: 0 }, &mut events);
        assert_eq!(query::play_mode(&world), PlayMode::Paused);
    }
}
