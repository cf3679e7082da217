#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Resolves adjacency synergies between ship cells.
//!
//! Every occupied cell looks at its six neighbors and consults a fixed
//! interaction table keyed by `[own color][neighbor color]`. The result is a
//! per-cell stack count for each [`SynergyKind`] plus ship-wide
//! [`SynergyStats`]. Resolutions are memoized against the ship version.

use std::collections::BTreeSet;

use hexbound_core::{CellColor, CellId, Event, ShipModifiers, ShipView};
use serde::{Deserialize, Serialize};

/// Hull regeneration per second granted by each Regeneration stack.
pub const REGENERATION_PER_STACK: f32 = 0.5;
/// Core maximum health granted by each Vitality stack.
pub const VITALITY_PER_STACK: f32 = 15.0;
/// Pickup attraction radius granted by each Magnetism stack.
pub const MAGNETISM_PER_STACK: f32 = 20.0;
/// Damage-taken factor applied once per Bulwark stack.
pub const BULWARK_FACTOR: f32 = 0.9;
/// Reflected contact damage per Thorns stack on the strongest cell.
pub const THORNS_PER_STACK: f32 = 6.0;
/// Movement speed factor applied once per Afterburner stack.
pub const AFTERBURNER_FACTOR: f32 = 1.08;
/// Slow percent per FrostField stack on the strongest cell.
pub const FROST_PER_STACK: f32 = 0.15;
/// Upper bound of the FrostField slow before ultimates.
pub const FROST_MAX_SLOW: f32 = 0.6;
/// Radius of the FrostField slow aura.
pub const FROST_RADIUS: f32 = 140.0;
/// Seconds a FrostField slow lingers after leaving the aura.
pub const FROST_DURATION: f32 = 0.5;
/// Base radius of the Stasis stun field.
pub const STASIS_BASE_RADIUS: f32 = 90.0;
/// Extra Stasis radius per stack on the strongest cell.
pub const STASIS_RADIUS_PER_STACK: f32 = 30.0;
/// Seconds a Stasis stun lasts.
pub const STASIS_STUN_DURATION: f32 = 1.0;
/// Extra projectiles per weapon granted by the Red ultimate.
pub const BARRAGE_BONUS_PROJECTILES: u32 = 2;
/// Regeneration factor granted by the Green ultimate.
pub const LIFEBLOOM_REGEN_FACTOR: f32 = 2.0;
/// Damage-taken factor granted by the Blue ultimate.
pub const AEGIS_DAMAGE_FACTOR: f32 = 0.5;
/// Fire interval factor granted by the Yellow ultimate.
pub const HYPERDRIVE_INTERVAL_FACTOR: f32 = 0.5;
/// Minimum slow percent guaranteed by the Cyan ultimate.
pub const ABSOLUTE_ZERO_SLOW: f32 = 0.6;
/// Minimum slow radius guaranteed by the Cyan ultimate.
pub const ABSOLUTE_ZERO_RADIUS: f32 = 220.0;

/// Effect produced by an ordered pair of adjacent cell colors.
///
/// The first six kinds are weapon-local: they only matter on the cell that
/// owns them. The rest aggregate into ship-wide [`SynergyStats`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SynergyKind {
    /// Red next to Red: one extra projectile per stack, additive.
    MultiShot,
    /// Red next to Yellow: fire interval multiplied by `0.7` per stack.
    RapidFire,
    /// Red next to Blue: slower, harder-hitting projectiles that knock back.
    HeavyImpact,
    /// Red next to Green: projectiles swell with distance travelled.
    Growth,
    /// Red next to Purple: projectiles pass through enemies.
    Piercing,
    /// Red next to Cyan: projectiles steer toward the nearest enemy.
    Homing,
    /// Green next to Green or Cyan: additive hull regeneration.
    Regeneration,
    /// Green and Blue together: additive core maximum health.
    Vitality,
    /// Green and Yellow together: additive pickup attraction radius.
    Magnetism,
    /// Green and Purple together: projectiles corrode what they hit.
    Corrosion,
    /// Blue next to Blue: damage taken multiplied by `0.9` per stack.
    Bulwark,
    /// Blue next to Red: contact damage reflected, strongest cell wins.
    Thorns,
    /// Blue and Purple together: stun field, strongest cell sets the radius.
    Stasis,
    /// Blue and Cyan together or Cyan next to Cyan: slow aura, strongest wins.
    FrostField,
    /// Yellow next to Yellow or Cyan, Cyan next to Yellow: faster movement.
    Afterburner,
    /// Yellow and Purple together: the first such cell emits shockwaves.
    Shockwave,
    /// Purple next to Purple or Cyan, Cyan next to Purple: entropic hits.
    Entropy,
}

impl SynergyKind {
    /// Number of synergy kinds.
    pub const COUNT: usize = 17;

    /// All synergy kinds in declaration order.
    pub const ALL: [SynergyKind; Self::COUNT] = [
        Self::MultiShot,
        Self::RapidFire,
        Self::HeavyImpact,
        Self::Growth,
        Self::Piercing,
        Self::Homing,
        Self::Regeneration,
        Self::Vitality,
        Self::Magnetism,
        Self::Corrosion,
        Self::Bulwark,
        Self::Thorns,
        Self::Stasis,
        Self::FrostField,
        Self::Afterburner,
        Self::Shockwave,
        Self::Entropy,
    ];

    /// Dense index of the kind.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the kind only affects the weapon cell that owns it.
    #[must_use]
    pub const fn is_weapon_local(self) -> bool {
        matches!(
            self,
            Self::MultiShot
                | Self::RapidFire
                | Self::HeavyImpact
                | Self::Growth
                | Self::Piercing
                | Self::Homing
        )
    }
}

/// Ship-wide bonus unlocked by a Ring of Perfection of one color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UltimateKind {
    /// Red ring: extra projectiles on every weapon.
    Barrage,
    /// Green ring: doubled regeneration.
    Lifebloom,
    /// Blue ring: halved damage taken.
    Aegis,
    /// Yellow ring: halved fire interval.
    Hyperdrive,
    /// Purple ring: every projectile is entropic.
    Singularity,
    /// Cyan ring: strong, wide slow aura.
    AbsoluteZero,
}

impl UltimateKind {
    /// Ultimate unlocked by a ring of `color`.
    #[must_use]
    pub const fn for_color(color: CellColor) -> Self {
        match color {
            CellColor::Red => Self::Barrage,
            CellColor::Green => Self::Lifebloom,
            CellColor::Blue => Self::Aegis,
            CellColor::Yellow => Self::Hyperdrive,
            CellColor::Purple => Self::Singularity,
            CellColor::Cyan => Self::AbsoluteZero,
        }
    }
}

use SynergyKind as S;

/// Interaction table indexed by `[own color][neighbor color]`.
pub const INTERACTIONS: [[Option<SynergyKind>; CellColor::COUNT]; CellColor::COUNT] = [
    // Red
    [
        Some(S::MultiShot),
        Some(S::Growth),
        Some(S::HeavyImpact),
        Some(S::RapidFire),
        Some(S::Piercing),
        Some(S::Homing),
    ],
    // Green
    [
        None,
        Some(S::Regeneration),
        Some(S::Vitality),
        Some(S::Magnetism),
        Some(S::Corrosion),
        Some(S::Regeneration),
    ],
    // Blue
    [
        Some(S::Thorns),
        Some(S::Vitality),
        Some(S::Bulwark),
        None,
        Some(S::Stasis),
        Some(S::FrostField),
    ],
    // Yellow
    [
        None,
        Some(S::Magnetism),
        None,
        Some(S::Afterburner),
        Some(S::Shockwave),
        Some(S::Afterburner),
    ],
    // Purple
    [
        None,
        Some(S::Corrosion),
        Some(S::Stasis),
        Some(S::Shockwave),
        Some(S::Entropy),
        Some(S::Entropy),
    ],
    // Cyan
    [
        None,
        None,
        Some(S::FrostField),
        Some(S::Afterburner),
        Some(S::Entropy),
        Some(S::FrostField),
    ],
];

/// Looks up the synergy a cell of color `own` gains from a `neighbor`.
#[must_use]
pub const fn interaction(own: CellColor, neighbor: CellColor) -> Option<SynergyKind> {
    INTERACTIONS[own.index()][neighbor.index()]
}

/// Stack counts of every synergy kind on a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellSynergies {
    stacks: [u32; SynergyKind::COUNT],
}

impl CellSynergies {
    /// Number of neighbors producing `kind` for this cell.
    #[must_use]
    pub const fn stacks(&self, kind: SynergyKind) -> u32 {
        self.stacks[kind.index()]
    }

    /// Whether at least one neighbor produces `kind`.
    #[must_use]
    pub const fn has(&self, kind: SynergyKind) -> bool {
        self.stacks(kind) > 0
    }

    /// Total links on this cell across all kinds.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.stacks.iter().sum()
    }

    fn add(&mut self, kind: SynergyKind) {
        self.stacks[kind.index()] += 1;
    }
}

/// Stun field projected around the ship.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StunField {
    /// Radius around the player in world units.
    pub radius: f32,
    /// Seconds each stun lasts.
    pub duration: f32,
}

/// Slow aura projected around the ship.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlowField {
    /// Radius around the player in world units.
    pub radius: f32,
    /// Fraction of speed removed.
    pub percent: f32,
    /// Seconds the slow lingers.
    pub duration: f32,
}

/// Ship-wide aggregate of every global synergy and unlocked ultimate.
#[derive(Clone, Debug, PartialEq)]
pub struct SynergyStats {
    /// Total links per kind, summed over all cells.
    pub link_counts: [u32; SynergyKind::COUNT],
    /// Hull health restored per second.
    pub hull_regen_per_sec: f32,
    /// Extra core maximum health.
    pub max_health_bonus: f32,
    /// Extra pickup attraction radius.
    pub pickup_radius_bonus: f32,
    /// Multiplier on incoming contact damage.
    pub damage_taken_multiplier: f32,
    /// Damage reflected to enemies touching the hull.
    pub thorns_damage: f32,
    /// Multiplier on movement speed.
    pub move_speed_multiplier: f32,
    /// Whether projectiles corrode their targets.
    pub corrosion: bool,
    /// Whether projectiles add entropy to their targets.
    pub entropy: bool,
    /// Active stun field, if any.
    pub stun_field: Option<StunField>,
    /// Active slow aura, if any.
    pub slow_field: Option<SlowField>,
    /// Cell emitting shockwaves; the lowest identifier with the synergy wins.
    pub shockwave_emitter: Option<CellId>,
    /// Projectiles added to every weapon volley.
    pub bonus_projectiles: u32,
    /// Multiplier on every weapon's fire interval.
    pub fire_interval_multiplier: f32,
    /// Unlocked ultimates, sorted and deduplicated.
    pub ultimates: Vec<UltimateKind>,
}

impl Default for SynergyStats {
    fn default() -> Self {
        Self {
            link_counts: [0; SynergyKind::COUNT],
            hull_regen_per_sec: 0.0,
            max_health_bonus: 0.0,
            pickup_radius_bonus: 0.0,
            damage_taken_multiplier: 1.0,
            thorns_damage: 0.0,
            move_speed_multiplier: 1.0,
            corrosion: false,
            entropy: false,
            stun_field: None,
            slow_field: None,
            shockwave_emitter: None,
            bonus_projectiles: 0,
            fire_interval_multiplier: 1.0,
            ultimates: Vec::new(),
        }
    }
}

impl SynergyStats {
    /// Total links of `kind` across the ship.
    #[must_use]
    pub const fn links(&self, kind: SynergyKind) -> u32 {
        self.link_counts[kind.index()]
    }

    /// Whether the ultimate is unlocked.
    #[must_use]
    pub fn has_ultimate(&self, ultimate: UltimateKind) -> bool {
        self.ultimates.binary_search(&ultimate).is_ok()
    }

    /// Modifiers the world applies to the hull and movement.
    #[must_use]
    pub fn ship_modifiers(&self) -> ShipModifiers {
        ShipModifiers {
            hull_regen_per_sec: self.hull_regen_per_sec,
            max_health_bonus: self.max_health_bonus,
            damage_taken_multiplier: self.damage_taken_multiplier,
            thorns_damage: self.thorns_damage,
            move_speed_multiplier: self.move_speed_multiplier,
        }
    }
}

/// Synergies of a ship at a specific version.
#[derive(Clone, Debug, PartialEq)]
pub struct SynergyResolution {
    version: u64,
    stats: SynergyStats,
    cells: Vec<CellSynergies>,
}

impl SynergyResolution {
    /// Ship version this resolution was computed from.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Ship-wide aggregate.
    #[must_use]
    pub const fn stats(&self) -> &SynergyStats {
        &self.stats
    }

    /// Local synergies of the cell `id`; empty for unknown cells.
    #[must_use]
    pub fn cell(&self, id: CellId) -> CellSynergies {
        self.cells.get(id.index()).copied().unwrap_or_default()
    }
}

/// Computes the synergies of `ship` without caching.
#[must_use]
pub fn compute(ship: &ShipView<'_>) -> SynergyResolution {
    let mut cells = vec![CellSynergies::default(); ship.len()];
    let mut ultimates = BTreeSet::new();

    for cell in ship.cells() {
        let own = cell.cell.color;
        let local = &mut cells[cell.id.index()];
        let mut same_color = 0;
        for coord in cell.coord.neighbors() {
            let Some(neighbor) = ship.cell_at(coord) else {
                continue;
            };
            if neighbor.cell.color == own {
                same_color += 1;
            }
            if let Some(kind) = interaction(own, neighbor.cell.color) {
                local.add(kind);
            }
        }
        if same_color == 6 {
            let _ = ultimates.insert(UltimateKind::for_color(own));
        }
    }

    let stats = aggregate(ship, &cells, ultimates.into_iter().collect());
    SynergyResolution {
        version: ship.version(),
        stats,
        cells,
    }
}

fn aggregate(
    ship: &ShipView<'_>,
    cells: &[CellSynergies],
    ultimates: Vec<UltimateKind>,
) -> SynergyStats {
    let mut stats = SynergyStats {
        ultimates,
        ..SynergyStats::default()
    };
    let mut stasis_stacks = 0;
    let mut frost_stacks = 0;
    let mut thorns_stacks = 0;

    for cell in ship.cells() {
        let local = &cells[cell.id.index()];
        for kind in SynergyKind::ALL {
            stats.link_counts[kind.index()] += local.stacks(kind);
        }
        stasis_stacks = stasis_stacks.max(local.stacks(S::Stasis));
        frost_stacks = frost_stacks.max(local.stacks(S::FrostField));
        thorns_stacks = thorns_stacks.max(local.stacks(S::Thorns));
        if stats.shockwave_emitter.is_none() && local.has(S::Shockwave) {
            stats.shockwave_emitter = Some(cell.id);
        }
    }

    stats.hull_regen_per_sec = REGENERATION_PER_STACK * stats.links(S::Regeneration) as f32;
    stats.max_health_bonus = VITALITY_PER_STACK * stats.links(S::Vitality) as f32;
    stats.pickup_radius_bonus = MAGNETISM_PER_STACK * stats.links(S::Magnetism) as f32;
    stats.damage_taken_multiplier = BULWARK_FACTOR.powi(stats.links(S::Bulwark) as i32);
    stats.move_speed_multiplier = AFTERBURNER_FACTOR.powi(stats.links(S::Afterburner) as i32);
    stats.thorns_damage = THORNS_PER_STACK * thorns_stacks as f32;
    stats.corrosion = stats.links(S::Corrosion) > 0;
    stats.entropy = stats.links(S::Entropy) > 0;

    if stasis_stacks > 0 {
        stats.stun_field = Some(StunField {
            radius: STASIS_BASE_RADIUS + STASIS_RADIUS_PER_STACK * stasis_stacks as f32,
            duration: STASIS_STUN_DURATION,
        });
    }
    if frost_stacks > 0 {
        stats.slow_field = Some(SlowField {
            radius: FROST_RADIUS,
            percent: (FROST_PER_STACK * frost_stacks as f32).min(FROST_MAX_SLOW),
            duration: FROST_DURATION,
        });
    }

    for ultimate in stats.ultimates.clone() {
        match ultimate {
            UltimateKind::Barrage => stats.bonus_projectiles += BARRAGE_BONUS_PROJECTILES,
            UltimateKind::Lifebloom => stats.hull_regen_per_sec *= LIFEBLOOM_REGEN_FACTOR,
            UltimateKind::Aegis => stats.damage_taken_multiplier *= AEGIS_DAMAGE_FACTOR,
            UltimateKind::Hyperdrive => {
                stats.fire_interval_multiplier *= HYPERDRIVE_INTERVAL_FACTOR;
            }
            UltimateKind::Singularity => stats.entropy = true,
            UltimateKind::AbsoluteZero => {
                let field = stats.slow_field.get_or_insert(SlowField {
                    radius: ABSOLUTE_ZERO_RADIUS,
                    percent: ABSOLUTE_ZERO_SLOW,
                    duration: FROST_DURATION,
                });
                field.radius = field.radius.max(ABSOLUTE_ZERO_RADIUS);
                field.percent = field.percent.max(ABSOLUTE_ZERO_SLOW);
            }
        }
    }

    stats
}

/// Memoizing resolver owned by the session and shared with the systems.
#[derive(Debug, Default)]
pub struct SynergyResolver {
    cache: Option<SynergyResolution>,
    cache_hits: u64,
    recomputations: u64,
}

impl SynergyResolver {
    /// Creates a resolver with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the cached resolution when the ship changed.
    pub fn handle(&mut self, events: &[Event]) {
        if events
            .iter()
            .any(|event| matches!(event, Event::ShipChanged { .. }))
        {
            self.invalidate();
        }
    }

    /// Drops the cached resolution unconditionally.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Returns the synergies of `ship`, recomputing only when the cache is
    /// empty or was computed for another version.
    pub fn resolve(&mut self, ship: &ShipView<'_>) -> &SynergyResolution {
        if self
            .cache
            .as_ref()
            .is_some_and(|cached| cached.version != ship.version())
        {
            self.cache = None;
        }
        if self.cache.is_some() {
            self.cache_hits += 1;
        } else {
            self.recomputations += 1;
        }
        self.cache.get_or_insert_with(|| compute(ship))
    }

    /// Number of lookups answered from the cache.
    #[must_use]
    pub const fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    /// Number of lookups that recomputed the resolution.
    #[must_use]
    pub const fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_pair_list() {
        use CellColor::*;
        assert_eq!(interaction(Red, Red), Some(S::MultiShot));
        assert_eq!(interaction(Red, Yellow), Some(S::RapidFire));
        assert_eq!(interaction(Blue, Red), Some(S::Thorns));
        assert_eq!(interaction(Green, Cyan), Some(S::Regeneration));
        assert_eq!(interaction(Cyan, Green), None);
        assert_eq!(interaction(Cyan, Cyan), Some(S::FrostField));
        assert_eq!(interaction(Yellow, Blue), None);
        assert_eq!(interaction(Purple, Cyan), Some(S::Entropy));
    }

    #[test]
    fn only_red_row_is_weapon_local() {
        for own in CellColor::ALL {
            for neighbor in CellColor::ALL {
                if let Some(kind) = interaction(own, neighbor) {
                    assert_eq!(kind.is_weapon_local(), own == CellColor::Red);
                }
            }
        }
    }

    #[test]
    fn kind_indices_are_dense() {
        for (index, kind) in SynergyKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), index);
        }
    }

    #[test]
    fn unknown_cell_has_no_synergies() {
        let resolution = SynergyResolution {
            version: 0,
            stats: SynergyStats::default(),
            cells: Vec::new(),
        };
        assert_eq!(resolution.cell(CellId::new(9)).total(), 0);
    }
}
