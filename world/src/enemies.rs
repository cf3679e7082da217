//! Per-enemy combat state.
//!
//! Status effects are independent timers rather than a single state enum:
//! an enemy can be slowed, knocked back and stunned at once. Stun alone also
//! suppresses movement and contact damage.

use glam::Vec2;
use hexbound_core::{EnemyId, EnemyKind, EnemyScaling, EnemySnapshot};

/// Damage multiplier applied to every hit on a corroded enemy.
pub const CORROSION_DAMAGE_MULTIPLIER: f32 = 1.3;
/// Flat damage added to every hit per accumulated entropy stack.
pub const ENTROPY_DAMAGE_PER_STACK: f32 = 2.0;
/// Seconds after a stun ends before another stun may land.
pub const STUN_GRACE_DELAY: f32 = 1.5;
/// Seconds a knockback suppresses target seeking.
pub const KNOCKBACK_DURATION: f32 = 0.25;
/// Seconds between two contact hits from the same enemy.
pub const CONTACT_COOLDOWN: f32 = 0.8;

const KNOCKBACK_DRAG: f32 = 6.0;
const MAX_SLOW: f32 = 0.9;

/// Status effects currently affecting an enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatusEffects {
    slow_percent: f32,
    slow_timer: f32,
    stunned: bool,
    stun_timer: f32,
    // Blocks reapplication until the countdown runs out.
    stun_guard: bool,
    stun_guard_timer: f32,
    corroded: bool,
    entropy_stacks: u32,
}

impl StatusEffects {
    /// Fraction of movement speed currently removed.
    #[must_use]
    pub fn slow_percent(&self) -> f32 {
        self.slow_percent
    }

    /// Whether a stun is active.
    #[must_use]
    pub fn is_stunned(&self) -> bool {
        self.stunned
    }

    /// Whether the stun guard still blocks a new stun.
    #[must_use]
    pub fn stun_guarded(&self) -> bool {
        self.stun_guard
    }

    /// Whether corrosion amplifies incoming damage.
    #[must_use]
    pub fn is_corroded(&self) -> bool {
        self.corroded
    }

    /// Accumulated entropy stacks. Entropy never decays.
    #[must_use]
    pub fn entropy_stacks(&self) -> u32 {
        self.entropy_stacks
    }

    fn tick(&mut self, dt: f32) {
        if self.stunned {
            self.stun_timer -= dt;
            if self.stun_timer <= 0.0 {
                self.stunned = false;
                self.stun_timer = 0.0;
            }
        }
        if self.stun_guard {
            self.stun_guard_timer -= dt;
            if self.stun_guard_timer <= 0.0 {
                self.stun_guard = false;
                self.stun_guard_timer = 0.0;
            }
        }
        if self.slow_timer > 0.0 {
            self.slow_timer -= dt;
            if self.slow_timer <= 0.0 {
                self.slow_timer = 0.0;
                self.slow_percent = 0.0;
            }
        }
    }
}

/// Data handed to the death callback of [`CombatEntity::apply_damage`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeathRecord {
    /// Enemy that died.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Position at the moment of death.
    pub position: Vec2,
}

/// A single enemy: hit points, movement and status effects.
#[derive(Clone, Debug)]
pub struct CombatEntity {
    id: EnemyId,
    kind: EnemyKind,
    hp: f32,
    max_hp: f32,
    position: Vec2,
    velocity: Vec2,
    speed: f32,
    contact_damage: f32,
    radius: f32,
    boss: bool,
    status: StatusEffects,
    knockback_timer: f32,
    contact_cooldown: f32,
    dead: bool,
}

impl CombatEntity {
    /// Creates an enemy from its archetype and wave scaling.
    #[must_use]
    pub fn spawn(id: EnemyId, kind: EnemyKind, position: Vec2, scaling: EnemyScaling) -> Self {
        let stats = kind.base_stats();
        let max_hp = (stats.max_hp * scaling.hp_multiplier).max(1.0);
        Self {
            id,
            kind,
            hp: max_hp,
            max_hp,
            position,
            velocity: Vec2::ZERO,
            speed: stats.speed,
            contact_damage: stats.contact_damage * scaling.damage_multiplier,
            radius: stats.radius,
            boss: kind.is_boss(),
            status: StatusEffects::default(),
            knockback_timer: 0.0,
            contact_cooldown: 0.0,
            dead: false,
        }
    }

    /// Identifier of the enemy.
    #[must_use]
    pub fn id(&self) -> EnemyId {
        self.id
    }

    /// Archetype of the enemy.
    #[must_use]
    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Current hit points, never negative.
    #[must_use]
    pub fn hp(&self) -> f32 {
        self.hp
    }

    /// World-space position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Whether the enemy ignores knockback, slow and stun.
    #[must_use]
    pub fn is_boss(&self) -> bool {
        self.boss
    }

    /// Whether the enemy has not died yet.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Status effects currently applied.
    #[must_use]
    pub fn status(&self) -> &StatusEffects {
        &self.status
    }

    /// Applies a hit of `amount` base damage and returns the damage dealt.
    ///
    /// Corrosion scales the amount by [`CORROSION_DAMAGE_MULTIPLIER`], then
    /// every entropy stack adds [`ENTROPY_DAMAGE_PER_STACK`]. Hit points clamp
    /// at zero. `on_death` runs exactly once, on the hit that kills; hits on
    /// a dead enemy do nothing.
    pub fn apply_damage<F>(&mut self, amount: f32, on_death: F) -> f32
    where
        F: FnOnce(DeathRecord),
    {
        if self.dead || amount <= 0.0 {
            return 0.0;
        }

        let mut dealt = amount;
        if self.status.corroded {
            dealt *= CORROSION_DAMAGE_MULTIPLIER;
        }
        dealt += ENTROPY_DAMAGE_PER_STACK * self.status.entropy_stacks as f32;

        self.hp = (self.hp - dealt).max(0.0);
        if self.hp <= 0.0 {
            self.dead = true;
            self.velocity = Vec2::ZERO;
            on_death(DeathRecord {
                id: self.id,
                kind: self.kind,
                position: self.position,
            });
        }
        dealt
    }

    /// Slows the enemy. Overlapping slows keep the stronger percent and the
    /// longer timer. Returns whether the slow landed.
    pub fn apply_slow(&mut self, percent: f32, duration: f32) -> bool {
        if self.boss || self.dead {
            return false;
        }
        if percent <= 0.0 || duration <= 0.0 {
            return false;
        }
        self.status.slow_percent = self.status.slow_percent.max(percent.min(MAX_SLOW));
        self.status.slow_timer = self.status.slow_timer.max(duration);
        true
    }

    /// Stuns the enemy unless a previous stun from the same exposure is still
    /// guarded. Returns whether the stun landed.
    pub fn apply_stun(&mut self, duration: f32) -> bool {
        if self.boss || self.dead {
            return false;
        }
        if self.status.stun_guard || duration <= 0.0 {
            return false;
        }
        self.status.stunned = true;
        self.status.stun_timer = duration;
        self.status.stun_guard = true;
        self.status.stun_guard_timer = duration + STUN_GRACE_DELAY;
        true
    }

    /// Pushes the enemy along `direction` and suspends target seeking for
    /// [`KNOCKBACK_DURATION`]. Returns whether the push landed.
    pub fn apply_knockback(&mut self, direction: Vec2, strength: f32) -> bool {
        if self.boss || self.dead {
            return false;
        }
        let Some(unit) = direction.try_normalize() else {
            return false;
        };
        self.velocity = unit * strength;
        self.knockback_timer = KNOCKBACK_DURATION;
        true
    }

    /// Marks the enemy corroded.
    pub fn apply_corrosion(&mut self) {
        if !self.dead {
            self.status.corroded = true;
        }
    }

    /// Adds entropy stacks.
    pub fn add_entropy(&mut self, stacks: u32) {
        if !self.dead {
            self.status.entropy_stacks = self.status.entropy_stacks.saturating_add(stacks);
        }
    }

    /// Whether a contact hit could land right now.
    #[must_use]
    pub fn can_contact(&self) -> bool {
        !self.dead && !self.status.stunned && self.contact_cooldown <= 0.0
    }

    /// Deals contact damage if allowed and starts the contact cooldown.
    pub fn try_contact(&mut self) -> Option<f32> {
        if !self.can_contact() {
            return None;
        }
        self.contact_cooldown = CONTACT_COOLDOWN;
        Some(self.contact_damage)
    }

    /// Advances timers by `dt` seconds and moves toward `target`.
    pub fn advance(&mut self, target: Vec2, dt: f32) {
        if self.dead || dt <= 0.0 {
            return;
        }

        self.contact_cooldown = (self.contact_cooldown - dt).max(0.0);
        let was_stunned = self.status.stunned;
        self.status.tick(dt);
        if was_stunned {
            return;
        }

        if self.knockback_timer > 0.0 {
            self.knockback_timer = (self.knockback_timer - dt).max(0.0);
            self.position += self.velocity * dt;
            self.velocity *= (-KNOCKBACK_DRAG * dt).exp();
            return;
        }

        let speed = self.speed * (1.0 - self.status.slow_percent);
        self.velocity = (target - self.position).normalize_or_zero() * speed;
        self.position += self.velocity * dt;
    }

    /// Displaces the enemy, used for separation.
    pub fn nudge(&mut self, offset: Vec2) {
        if !self.dead {
            self.position += offset;
        }
    }

    /// Captures an immutable snapshot for systems.
    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            radius: self.radius,
            hp: self.hp,
            max_hp: self.max_hp,
            stunned: self.status.stunned,
            slowed: self.status.slow_percent > 0.0,
            contact_ready: self.can_contact(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grunt() -> CombatEntity {
        CombatEntity::spawn(
            EnemyId::new(1),
            EnemyKind::Grunt,
            Vec2::new(100.0, 0.0),
            EnemyScaling::default(),
        )
    }

    fn boss() -> CombatEntity {
        CombatEntity::spawn(
            EnemyId::new(2),
            EnemyKind::Behemoth,
            Vec2::new(0.0, 100.0),
            EnemyScaling::default(),
        )
    }

    #[test]
    fn overkill_clamps_to_zero_and_fires_death_once() {
        let mut entity = grunt();
        entity.max_hp = 50.0;
        entity.hp = 50.0;

        let mut deaths = Vec::new();
        let dealt = entity.apply_damage(60.0, |record| deaths.push(record));
        assert!((dealt - 60.0).abs() < f32::EPSILON);
        assert_eq!(entity.hp(), 0.0);
        assert!(!entity.is_alive());

        let again = entity.apply_damage(10.0, |record| deaths.push(record));
        assert_eq!(again, 0.0);
        assert_eq!(deaths.len(), 1);
        assert_eq!(deaths[0].id, EnemyId::new(1));
    }

    #[test]
    fn corrosion_and_entropy_amplify_damage() {
        let mut entity = grunt();
        entity.max_hp = 1_000.0;
        entity.hp = 1_000.0;
        entity.apply_corrosion();
        entity.add_entropy(3);

        let dealt = entity.apply_damage(10.0, |_| panic!("must survive"));
        let expected = 10.0 * CORROSION_DAMAGE_MULTIPLIER + 3.0 * ENTROPY_DAMAGE_PER_STACK;
        assert!((dealt - expected).abs() < 1e-4);
        assert!((entity.hp() - (1_000.0 - expected)).abs() < 1e-3);
    }

    #[test]
    fn bosses_ignore_crowd_control() {
        let mut entity = boss();
        entity.advance(Vec2::ZERO, 0.1);
        let velocity = entity.velocity();
        let status = *entity.status();

        assert!(!entity.apply_knockback(Vec2::X, 400.0));
        assert!(!entity.apply_slow(0.5, 2.0));
        assert!(!entity.apply_stun(1.0));

        assert_eq!(entity.velocity(), velocity);
        assert_eq!(*entity.status(), status);
        assert_eq!(entity.knockback_timer, 0.0);
    }

    #[test]
    fn bosses_still_take_corrosion_and_entropy() {
        let mut entity = boss();
        entity.apply_corrosion();
        entity.add_entropy(2);
        assert!(entity.status().is_corroded());
        assert_eq!(entity.status().entropy_stacks(), 2);
    }

    #[test]
    fn stun_blocks_contact_for_exactly_its_duration() {
        let mut entity = grunt();
        assert!(entity.apply_stun(1.0));
        assert_eq!(entity.try_contact(), None);

        entity.advance(Vec2::ZERO, 0.5);
        assert_eq!(entity.try_contact(), None);
        assert_eq!(entity.position(), Vec2::new(100.0, 0.0));

        entity.advance(Vec2::ZERO, 0.5);
        assert!(!entity.status().is_stunned());
        assert!(entity.try_contact().is_some());
    }

    #[test]
    fn stun_cannot_reapply_until_grace_elapses() {
        let mut entity = grunt();
        assert!(entity.apply_stun(1.0));
        entity.advance(Vec2::ZERO, 1.0);
        assert!(!entity.status().is_stunned());
        assert!(!entity.apply_stun(1.0), "guard still active");

        entity.advance(Vec2::ZERO, 1.0);
        assert!(!entity.apply_stun(1.0), "grace delay not yet over");

        entity.advance(Vec2::ZERO, 0.5);
        assert!(!entity.status().stun_guarded());
        assert!(entity.apply_stun(1.0));
    }

    #[test]
    fn contact_cooldown_is_independent_of_knockback() {
        let mut entity = grunt();
        assert!(entity.try_contact().is_some());
        assert!(entity.apply_knockback(Vec2::X, 300.0));
        assert_eq!(entity.try_contact(), None);
        entity.advance(Vec2::ZERO, CONTACT_COOLDOWN);
        assert!(entity.try_contact().is_some());
    }

    #[test]
    fn knockback_suppresses_seeking() {
        let mut entity = grunt();
        assert!(entity.apply_knockback(Vec2::X, 300.0));
        entity.advance(Vec2::ZERO, 0.1);
        assert!(entity.position().x > 100.0, "pushed away from target");

        entity.advance(Vec2::ZERO, KNOCKBACK_DURATION);
        let before = entity.position().x;
        entity.advance(Vec2::ZERO, 0.1);
        assert!(entity.position().x < before, "seeking resumed");
    }

    #[test]
    fn zero_length_knockback_is_a_no_op() {
        let mut entity = grunt();
        assert!(!entity.apply_knockback(Vec2::ZERO, 300.0));
        assert_eq!(entity.velocity(), Vec2::ZERO);
    }

    #[test]
    fn slow_reduces_speed_until_it_expires() {
        let mut fast = grunt();
        let mut slowed = grunt();
        assert!(slowed.apply_slow(0.5, 1.0));

        fast.advance(Vec2::ZERO, 0.5);
        slowed.advance(Vec2::ZERO, 0.5);
        let fast_travel = 100.0 - fast.position().x;
        let slow_travel = 100.0 - slowed.position().x;
        assert!((slow_travel - fast_travel * 0.5).abs() < 1e-3);

        slowed.advance(Vec2::ZERO, 0.5);
        assert_eq!(slowed.status().slow_percent(), 0.0);
    }

    #[test]
    fn reaching_the_target_does_not_produce_nan() {
        let mut entity = grunt();
        entity.advance(Vec2::new(100.0, 0.0), 0.1);
        assert_eq!(entity.velocity(), Vec2::ZERO);
        assert!(entity.position().is_finite());
    }
}
