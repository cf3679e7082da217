//! Projectile integration: lifetime, homing and growth.

use std::{
    collections::HashSet,
    f32::consts::{PI, TAU},
};

use glam::Vec2;
use hexbound_core::{EnemyId, ProjectileId, ProjectileSnapshot, ProjectileSpec};

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    id: ProjectileId,
    position: Vec2,
    heading: f32,
    spec: ProjectileSpec,
    remaining: f32,
    travelled: f32,
    struck: HashSet<EnemyId>,
}

impl Projectile {
    pub(crate) fn new(id: ProjectileId, origin: Vec2, heading: f32, spec: ProjectileSpec) -> Self {
        Self {
            id,
            position: origin,
            heading,
            spec,
            remaining: spec.lifetime,
            travelled: 0.0,
            struck: HashSet::new(),
        }
    }

    pub(crate) fn id(&self) -> ProjectileId {
        self.id
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn heading(&self) -> f32 {
        self.heading
    }

    pub(crate) fn spec(&self) -> &ProjectileSpec {
        &self.spec
    }

    fn scale(&self) -> f32 {
        self.spec
            .growth
            .map_or(1.0, |growth| growth.scale_at(self.travelled))
    }

    /// Damage per hit including growth.
    pub(crate) fn damage(&self) -> f32 {
        self.spec.damage * self.scale()
    }

    /// Collision radius including growth.
    pub(crate) fn size(&self) -> f32 {
        self.spec.size * self.scale()
    }

    /// Records a strike on `enemy`; false if it was struck before.
    pub(crate) fn register_hit(&mut self, enemy: EnemyId) -> bool {
        self.struck.insert(enemy)
    }

    /// Moves the projectile and returns whether its lifetime remains.
    ///
    /// Homing projectiles turn toward `target` by at most `turn_rate * dt`.
    pub(crate) fn advance(&mut self, dt: f32, target: Option<Vec2>) -> bool {
        if let (Some(homing), Some(target)) = (self.spec.homing, target) {
            let to_target = target - self.position;
            if to_target.length_squared() > f32::EPSILON {
                let desired = to_target.y.atan2(to_target.x);
                let max_turn = homing.turn_rate * dt;
                let turn = wrap_angle(desired - self.heading).clamp(-max_turn, max_turn);
                self.heading = wrap_angle(self.heading + turn);
            }
        }

        let step = self.spec.speed * dt;
        self.position += Vec2::from_angle(self.heading) * step;
        self.travelled += step;
        self.remaining -= dt;
        self.remaining > 0.0
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            heading: self.heading,
            size: self.size(),
            damage: self.damage(),
            piercing: self.spec.piercing,
        }
    }
}

/// Wraps an angle into `(-PI, PI]`.
pub(crate) fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexbound_core::{GrowthSpec, HomingSpec};

    fn spec() -> ProjectileSpec {
        ProjectileSpec {
            damage: 10.0,
            speed: 100.0,
            size: 5.0,
            lifetime: 1.0,
            piercing: false,
            homing: None,
            heavy: false,
            growth: None,
            corrosive: false,
            entropic: false,
        }
    }

    #[test]
    fn lifetime_expires() {
        let mut projectile = Projectile::new(ProjectileId::new(0), Vec2::ZERO, 0.0, spec());
        assert!(projectile.advance(0.5, None));
        assert!(!projectile.advance(0.5, None));
        assert!((projectile.position().x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn homing_turn_is_bounded_per_tick() {
        let mut homing = spec();
        homing.homing = Some(HomingSpec { turn_rate: 1.0 });
        let mut projectile = Projectile::new(ProjectileId::new(0), Vec2::ZERO, 0.0, homing);
        let _ = projectile.advance(0.1, Some(Vec2::new(0.0, 500.0)));
        assert!((projectile.heading() - 0.1).abs() < 1e-4);
    }

    #[test]
    fn growth_increases_size_and_damage_with_distance() {
        let mut growing = spec();
        growing.growth = Some(GrowthSpec {
            max_scale: 2.0,
            rate: 0.01,
        });
        let mut projectile = Projectile::new(ProjectileId::new(0), Vec2::ZERO, 0.0, growing);
        let start = projectile.snapshot();
        let _ = projectile.advance(0.5, None);
        let later = projectile.snapshot();
        assert!(later.size > start.size);
        assert!(later.damage > start.damage);
        assert!(later.damage < 20.0);
    }

    #[test]
    fn hits_register_once_per_enemy() {
        let mut projectile = Projectile::new(ProjectileId::new(0), Vec2::ZERO, 0.0, spec());
        assert!(projectile.register_hit(EnemyId::new(3)));
        assert!(!projectile.register_hit(EnemyId::new(3)));
        assert!(projectile.register_hit(EnemyId::new(4)));
    }

    #[test]
    fn wrap_angle_stays_in_half_open_range() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
    }
}
