#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hexbound engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The session submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems
//! to react to deterministically. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

pub mod hex;

use std::{collections::HashMap, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use hex::{HexCoord, HexLayout};

/// Describes the active gameplay mode for the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    /// Timers run and entities move.
    Running,
    /// Every timer is frozen and movement integration halts.
    Paused,
    /// The core cell was destroyed; the run is over.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the world transition to the provided play mode.
    SetPlayMode {
        /// Mode the world should activate.
        mode: PlayMode,
    },
    /// Sets the normalized direction the player ship travels in.
    SteerPlayer {
        /// Desired movement; vectors longer than one are normalized.
        direction: Vec2,
    },
    /// Attaches a module cell to the ship.
    AttachCell {
        /// Empty coordinate adjacent to the ship.
        coord: HexCoord,
        /// Color of the new module.
        color: CellColor,
    },
    /// Queues a set of module choices for the player to pick from.
    OfferModules {
        /// Candidate modules, each at a valid attachment site.
        choices: Vec<ModuleChoice>,
    },
    /// Attaches the module at `index` of the oldest pending offer.
    SelectOffer {
        /// Position of the chosen module within the offer.
        index: usize,
    },
    /// Replaces the ship-wide modifiers derived from synergies.
    ConfigureShipModifiers {
        /// Modifiers to apply from the next tick onward.
        modifiers: ShipModifiers,
    },
    /// Records that a new wave began.
    BeginWave {
        /// One-based wave counter.
        wave: u32,
    },
    /// Spawns an enemy at the provided position.
    SpawnEnemy {
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// World-space spawn location.
        position: Vec2,
        /// Wave scaling applied to the base stats of the archetype.
        scaling: EnemyScaling,
    },
    /// Launches a projectile from a weapon cell.
    FireProjectile {
        /// Weapon cell that fired.
        source: CellId,
        /// World-space launch point.
        origin: Vec2,
        /// Launch heading in radians.
        heading: f32,
        /// Stats and behavior of the projectile.
        spec: ProjectileSpec,
    },
    /// Resolves a projectile striking an enemy.
    ResolveHit {
        /// Projectile that made contact.
        projectile: ProjectileId,
        /// Enemy that was struck.
        enemy: EnemyId,
    },
    /// Resolves an enemy touching a ship cell.
    ContactHull {
        /// Enemy that made contact.
        enemy: EnemyId,
        /// Ship cell that was touched.
        cell: CellId,
    },
    /// Displaces an enemy, used to separate overlapping enemies.
    NudgeEnemy {
        /// Enemy to displace.
        enemy: EnemyId,
        /// World-space displacement.
        offset: Vec2,
    },
    /// Applies a status effect to an enemy.
    ApplyStatus {
        /// Enemy receiving the effect.
        enemy: EnemyId,
        /// Effect to apply.
        effect: StatusEffect,
    },
    /// Sets the velocity of a pickup drawn toward the player.
    AttractPickup {
        /// Pickup being attracted.
        pickup: PickupId,
        /// World-space velocity in units per second.
        velocity: Vec2,
    },
    /// Collects a pickup, granting its experience.
    CollectPickup {
        /// Pickup to collect.
        pickup: PickupId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the simulation entered a new play mode.
    PlayModeChanged {
        /// Mode that became active after processing commands.
        mode: PlayMode,
    },
    /// Confirms that a cell was attached and the ship version advanced.
    ShipChanged {
        /// Version of the ship after the mutation.
        version: u64,
        /// Identifier assigned to the new cell.
        cell: CellId,
        /// Coordinate of the new cell.
        coord: HexCoord,
    },
    /// Reports that an attach request was rejected.
    AttachRejected {
        /// Coordinate provided in the request.
        coord: HexCoord,
        /// Specific reason the attach failed.
        reason: AttachError,
    },
    /// Reports that an offer selection was rejected.
    SelectionRejected {
        /// Index provided in the request.
        index: usize,
        /// Specific reason the selection failed.
        reason: SelectionError,
    },
    /// Announces a module offer awaiting the player's choice.
    OfferPresented {
        /// Choices available to the player.
        choices: Vec<ModuleChoice>,
    },
    /// Announces the start of a wave.
    WaveStarted {
        /// One-based wave counter.
        wave: u32,
    },
    /// Confirms that an enemy entered the world.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Spawn location.
        position: Vec2,
    },
    /// Reports damage dealt to an enemy.
    EnemyDamaged {
        /// Enemy that took damage.
        enemy: EnemyId,
        /// Damage after corrosion and entropy were applied.
        amount: f32,
        /// Hit points left, never negative.
        remaining: f32,
    },
    /// Reports that an enemy died.
    EnemyDied {
        /// Enemy that died.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Location of death.
        position: Vec2,
    },
    /// Confirms that a projectile was launched.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Weapon cell that fired it.
        source: CellId,
    },
    /// Reports that a projectile left the world.
    ProjectileRemoved {
        /// Projectile that was removed.
        projectile: ProjectileId,
    },
    /// Reports damage dealt to a ship cell.
    HullDamaged {
        /// Cell that absorbed the hit first.
        cell: CellId,
        /// Damage after the ship's damage-taken multiplier.
        amount: f32,
        /// Core health left after the hit.
        core_remaining: f32,
    },
    /// Reports that an experience pickup was created.
    PickupDropped {
        /// Identifier assigned to the pickup.
        pickup: PickupId,
        /// Experience carried by the pickup.
        value: u32,
    },
    /// Reports that the player collected a pickup.
    PickupCollected {
        /// Pickup that was collected.
        pickup: PickupId,
        /// Experience granted.
        value: u32,
    },
    /// Announces that the player reached a new level.
    LevelReached {
        /// New level.
        level: u32,
    },
    /// Announces that the core cell was destroyed.
    PlayerDestroyed,
}

/// Colors a hex cell can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CellColor {
    /// Attack color; every red cell is a weapon.
    Red,
    /// Growth and regeneration.
    Green,
    /// Defense.
    Blue,
    /// Speed and energy.
    Yellow,
    /// Void effects such as stun and entropy.
    Purple,
    /// Frost effects.
    Cyan,
}

impl CellColor {
    /// Number of distinct colors.
    pub const COUNT: usize = 6;

    /// Every color in ordinal order.
    pub const ALL: [CellColor; Self::COUNT] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Yellow,
        Self::Purple,
        Self::Cyan,
    ];

    /// Ordinal of the color, suitable for indexing fixed tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Yellow => 3,
            Self::Purple => 4,
            Self::Cyan => 5,
        }
    }
}

/// Distinguishes the ship's core from attached modules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// The single cell at the origin. Always a weapon; its destruction ends the run.
    Core,
    /// Any cell attached after the run started.
    Module,
}

/// Stored state of a single hex cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexCell {
    /// Core or module.
    pub kind: CellKind,
    /// Color driving synergy lookups.
    pub color: CellColor,
    /// Current integrity, never negative.
    pub health: f32,
    /// Integrity the cell regenerates toward.
    pub max_health: f32,
}

/// A hex cell together with its address on the ship.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShipCell {
    /// Stable identifier assigned at attach time.
    pub id: CellId,
    /// Axial coordinate of the cell.
    pub coord: HexCoord,
    /// Cell state.
    pub cell: HexCell,
}

impl ShipCell {
    /// Reports whether the cell fires projectiles.
    #[must_use]
    pub fn is_weapon(&self) -> bool {
        self.cell.kind == CellKind::Core || self.cell.color == CellColor::Red
    }
}

/// Read-only view of the ship borrowed from the world.
#[derive(Clone, Copy, Debug)]
pub struct ShipView<'a> {
    version: u64,
    cells: &'a [ShipCell],
    lookup: &'a HashMap<HexCoord, CellId>,
}

impl<'a> ShipView<'a> {
    /// Captures a view backed by the provided cell arena and coordinate index.
    ///
    /// `cells[id]` must hold the cell whose identifier is `id`.
    #[must_use]
    pub fn new(version: u64, cells: &'a [ShipCell], lookup: &'a HashMap<HexCoord, CellId>) -> Self {
        Self {
            version,
            cells,
            lookup,
        }
    }

    /// Monotonic counter advanced by every ship mutation.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Cells ordered by identifier.
    #[must_use]
    pub fn cells(&self) -> &'a [ShipCell] {
        self.cells
    }

    /// Looks up a cell by identifier.
    #[must_use]
    pub fn get(&self, id: CellId) -> Option<&'a ShipCell> {
        self.cells.get(id.index())
    }

    /// Looks up the cell occupying `coord`, if any.
    #[must_use]
    pub fn cell_at(&self, coord: HexCoord) -> Option<&'a ShipCell> {
        self.lookup.get(&coord).and_then(|id| self.get(*id))
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the ship holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A module the player may pick during a level-up offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleChoice {
    /// Attachment site for the module.
    pub coord: HexCoord,
    /// Color of the module.
    pub color: CellColor,
}

/// Reasons an attach request may be rejected by the world.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachError {
    /// A cell already occupies the coordinate.
    #[error("coordinate {0:?} is already occupied")]
    Occupied(HexCoord),
    /// The coordinate does not touch any occupied cell.
    #[error("coordinate {0:?} is not adjacent to the ship")]
    NotAdjacent(HexCoord),
    /// The run is over; the ship no longer changes.
    #[error("the run has ended")]
    RunEnded,
    /// Every cell identifier is in use.
    #[error("the ship cannot hold more than {} cells", u32::MAX)]
    ShipFull,
}

/// Reasons an offer selection may be rejected by the world.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionError {
    /// No offer awaits a decision.
    #[error("no module offer is pending")]
    NoOfferPending,
    /// The index lies outside the pending offer.
    #[error("choice {index} is outside an offer of {len}")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Number of choices in the offer.
        len: usize,
    },
    /// The chosen module could not be attached.
    #[error("chosen module could not be attached: {0}")]
    Attach(AttachError),
}

/// Ship-wide modifiers derived from synergies and consumed by the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShipModifiers {
    /// Core health restored per second.
    pub hull_regen_per_sec: f32,
    /// Extra maximum health granted to the core.
    pub max_health_bonus: f32,
    /// Multiplier applied to incoming contact damage.
    pub damage_taken_multiplier: f32,
    /// Damage reflected to an enemy whenever it touches the ship.
    pub thorns_damage: f32,
    /// Multiplier applied to the player's movement speed.
    pub move_speed_multiplier: f32,
}

impl Default for ShipModifiers {
    fn default() -> Self {
        Self {
            hull_regen_per_sec: 0.0,
            max_health_bonus: 0.0,
            damage_taken_multiplier: 1.0,
            thorns_damage: 0.0,
            move_speed_multiplier: 1.0,
        }
    }
}

/// Enemy archetypes, including the bosses cycled by the wave director.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast, fragile chaser.
    Scout,
    /// Baseline enemy.
    Grunt,
    /// Slow and durable.
    Brute,
    /// First boss of each cycle.
    Sentinel,
    /// Second boss of each cycle.
    Behemoth,
    /// Third boss of each cycle.
    Harbinger,
}

impl EnemyKind {
    /// Boss archetypes in the order the wave director cycles through them.
    pub const BOSS_ROTATION: [EnemyKind; 3] = [Self::Sentinel, Self::Behemoth, Self::Harbinger];

    /// Reports whether the archetype is a boss, immune to crowd control.
    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(self, Self::Sentinel | Self::Behemoth | Self::Harbinger)
    }

    /// Unscaled stats of the archetype.
    #[must_use]
    pub const fn base_stats(self) -> EnemyStats {
        match self {
            Self::Scout => EnemyStats::new(20.0, 110.0, 6.0, 12.0, 10, 1),
            Self::Grunt => EnemyStats::new(45.0, 80.0, 10.0, 16.0, 20, 2),
            Self::Brute => EnemyStats::new(120.0, 55.0, 18.0, 24.0, 45, 4),
            Self::Sentinel => EnemyStats::new(1_200.0, 60.0, 25.0, 48.0, 500, 25),
            Self::Behemoth => EnemyStats::new(2_000.0, 40.0, 35.0, 60.0, 750, 35),
            Self::Harbinger => EnemyStats::new(1_500.0, 75.0, 30.0, 52.0, 900, 40),
        }
    }
}

/// Base stats associated with an [`EnemyKind`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Maximum hit points before scaling.
    pub max_hp: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Damage dealt on contact before scaling.
    pub contact_damage: f32,
    /// Collision radius.
    pub radius: f32,
    /// Score awarded on death.
    pub score: u32,
    /// Experience dropped on death.
    pub experience: u32,
}

impl EnemyStats {
    const fn new(
        max_hp: f32,
        speed: f32,
        contact_damage: f32,
        radius: f32,
        score: u32,
        experience: u32,
    ) -> Self {
        Self {
            max_hp,
            speed,
            contact_damage,
            radius,
            score,
            experience,
        }
    }
}

/// Wave scaling applied to an enemy at spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyScaling {
    /// Multiplier applied to maximum hit points.
    pub hp_multiplier: f32,
    /// Multiplier applied to contact damage.
    pub damage_multiplier: f32,
}

impl Default for EnemyScaling {
    fn default() -> Self {
        Self {
            hp_multiplier: 1.0,
            damage_multiplier: 1.0,
        }
    }
}

/// Crowd-control and debuff effects that can be applied to an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StatusEffect {
    /// Reduces movement speed by `percent` for `duration` seconds.
    Slow {
        /// Fraction of speed removed, between zero and one.
        percent: f32,
        /// Seconds the slow lasts.
        duration: f32,
    },
    /// Halts movement and contact damage for `duration` seconds.
    Stun {
        /// Seconds the stun lasts.
        duration: f32,
    },
    /// Pushes the enemy away and suspends target seeking.
    Knockback {
        /// Push direction; need not be normalized.
        direction: Vec2,
        /// Initial push speed in world units per second.
        strength: f32,
    },
    /// Amplifies all further damage taken.
    Corrosion,
    /// Adds permanent flat damage to every further hit.
    Entropy {
        /// Stacks to add.
        stacks: u32,
    },
}

/// Homing behavior of a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HomingSpec {
    /// Maximum heading change in radians per second.
    pub turn_rate: f32,
}

/// Growth-over-distance behavior of a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrowthSpec {
    /// Asymptotic ceiling of the size and damage scale.
    pub max_scale: f32,
    /// Approach rate per world unit travelled.
    pub rate: f32,
}

impl GrowthSpec {
    /// Scale reached after travelling `distance`, approaching `max_scale`.
    #[must_use]
    pub fn scale_at(&self, distance: f32) -> f32 {
        if distance <= 0.0 || self.max_scale <= 1.0 {
            return 1.0;
        }
        1.0 + (self.max_scale - 1.0) * (1.0 - (-self.rate * distance).exp())
    }
}

/// Stats and behavior flags of a fired projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSpec {
    /// Damage dealt per hit before growth.
    pub damage: f32,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Collision radius before growth.
    pub size: f32,
    /// Seconds before the projectile expires.
    pub lifetime: f32,
    /// Survives hits and strikes each enemy once.
    pub piercing: bool,
    /// Re-aims toward the nearest live enemy.
    pub homing: Option<HomingSpec>,
    /// Knocks struck enemies back.
    pub heavy: bool,
    /// Grows with distance travelled.
    pub growth: Option<GrowthSpec>,
    /// Applies corrosion on hit.
    pub corrosive: bool,
    /// Applies one entropy stack on hit.
    pub entropic: bool,
}

/// Unique identifier assigned to a ship cell; also its index in the cell arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(u32);

impl CellId {
    /// Creates a new cell identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Position of the cell in dense per-cell arrays.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Axis-aligned camera rectangle in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Center of the visible region.
    pub center: Vec2,
    /// Half of the visible width and height.
    pub half_extents: Vec2,
}

impl Viewport {
    /// Creates a viewport centered on `center`.
    #[must_use]
    pub const fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Reports whether the point lies inside the viewport, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let delta = (point - self.center).abs();
        delta.x <= self.half_extents.x && delta.y <= self.half_extents.y
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// World-space position.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Current hit points.
    pub hp: f32,
    /// Maximum hit points.
    pub max_hp: f32,
    /// Whether a stun is active.
    pub stunned: bool,
    /// Whether a slow is active.
    pub slowed: bool,
    /// Whether the contact cooldown has elapsed and the enemy is not stunned.
    pub contact_ready: bool,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Live enemy closest to `point`, ties broken by identifier.
    #[must_use]
    pub fn nearest(&self, point: Vec2) -> Option<&EnemySnapshot> {
        self.snapshots.iter().fold(None, |best, candidate| {
            let distance = candidate.position.distance_squared(point);
            match best {
                Some(current) if current.position.distance_squared(point) <= distance => {
                    Some(current)
                }
                _ => Some(candidate),
            }
        })
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// World-space position.
    pub position: Vec2,
    /// Heading in radians.
    pub heading: f32,
    /// Collision radius including growth.
    pub size: f32,
    /// Damage per hit including growth.
    pub damage: f32,
    /// Whether the projectile survives hits.
    pub piercing: bool,
}

/// Read-only snapshot describing all live projectiles.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single pickup used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Unique identifier assigned to the pickup.
    pub id: PickupId,
    /// World-space position.
    pub position: Vec2,
    /// Experience granted on collection.
    pub value: u32,
}

/// Read-only snapshot describing all uncollected pickups.
#[derive(Clone, Debug, Default)]
pub struct PickupView {
    snapshots: Vec<PickupSnapshot>,
}

impl PickupView {
    /// Creates a new pickup view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PickupSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured pickup snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PickupSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PickupSnapshot> {
        self.snapshots
    }
}
