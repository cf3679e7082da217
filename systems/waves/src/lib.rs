#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave director that escalates enemy pressure over time.
//!
//! Waves advance on a fixed timer. Every transition rescales enemy stats and
//! spawn cadence; every fifth wave also schedules a boss, cycling through
//! [`EnemyKind::BOSS_ROTATION`] with prestige scaling for each full cycle.

use std::time::Duration;

use glam::Vec2;
use hexbound_core::{Command, EnemyKind, EnemyScaling, Event, PlayMode, Viewport};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// Waves between bosses.
pub const BOSS_WAVE_INTERVAL: u32 = 5;
/// Upper bound of enemies spawned per burst.
pub const MAX_SPAWN_COUNT: u32 = 8;
/// Lower bound of the spawn interval in seconds.
pub const MIN_SPAWN_INTERVAL: f32 = 0.4;

/// Configuration parameters required to construct the wave director.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Time each wave lasts.
    pub wave_duration: Duration,
    /// Distance beyond the viewport edge where enemies appear.
    pub spawn_margin: f32,
    /// Seed of the placement generator.
    pub rng_seed: u64,
}

impl Config {
    /// Creates a configuration with the standard wave duration.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            wave_duration: Duration::from_secs(30),
            spawn_margin: 60.0,
            rng_seed,
        }
    }

    /// Switches to short waves for quick iteration.
    #[must_use]
    pub const fn with_test_mode(mut self) -> Self {
        self.wave_duration = Duration::from_secs(5);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Boss scheduled by a wave transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossSpawn {
    /// Boss archetype.
    pub kind: EnemyKind,
    /// Scaling including prestige.
    pub scaling: EnemyScaling,
}

/// Parameters that apply from the start of a wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveTransition {
    /// One-based wave number.
    pub wave: u32,
    /// Scaling of regular enemies.
    pub scaling: EnemyScaling,
    /// Enemies per spawn burst.
    pub spawn_count: u32,
    /// Time between spawn bursts.
    pub spawn_interval: Duration,
    /// Boss spawned at the start of the wave, if any.
    pub boss: Option<BossSpawn>,
}

/// Computes the parameters of `wave`.
#[must_use]
pub fn transition(wave: u32) -> WaveTransition {
    let wave = wave.max(1);
    let step = (wave - 1) as f32;
    let scaling = EnemyScaling {
        hp_multiplier: 1.0 + 0.25 * step,
        damage_multiplier: 1.08_f32.powi((wave - 1) as i32),
    };
    let spawn_count = (1 + (wave - 1) / 2).min(MAX_SPAWN_COUNT);
    let spawn_interval = Duration::from_secs_f32((2.0 - 0.1 * step).max(MIN_SPAWN_INTERVAL));

    let boss = (wave % BOSS_WAVE_INTERVAL == 0).then(|| {
        let ordinal = wave / BOSS_WAVE_INTERVAL - 1;
        let rotation = EnemyKind::BOSS_ROTATION.len() as u32;
        let kind = EnemyKind::BOSS_ROTATION[(ordinal % rotation) as usize];
        let prestige = 1.0 + 0.5 * (ordinal / rotation) as f32;
        BossSpawn {
            kind,
            scaling: EnemyScaling {
                hp_multiplier: scaling.hp_multiplier * prestige,
                damage_multiplier: scaling.damage_multiplier * prestige,
            },
        }
    });

    WaveTransition {
        wave,
        scaling,
        spawn_count,
        spawn_interval,
        boss,
    }
}

/// Regular archetypes available in `wave`.
fn roster(wave: u32) -> &'static [EnemyKind] {
    match wave {
        0..=1 => &[EnemyKind::Scout],
        2..=3 => &[EnemyKind::Scout, EnemyKind::Grunt],
        _ => &[EnemyKind::Scout, EnemyKind::Grunt, EnemyKind::Brute],
    }
}

/// Pure system that advances waves and emits spawn commands.
#[derive(Debug)]
pub struct WaveDirector {
    config: Config,
    rng: ChaCha8Rng,
    current: Option<WaveTransition>,
    wave_elapsed: Duration,
    spawn_accumulator: Duration,
}

impl WaveDirector {
    /// Creates a wave director that starts wave one on its first running tick.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
            current: None,
            wave_elapsed: Duration::ZERO,
            spawn_accumulator: Duration::ZERO,
        }
    }

    /// Wave currently in progress; zero before the first.
    #[must_use]
    pub fn wave(&self) -> u32 {
        self.current.map_or(0, |current| current.wave)
    }

    /// Consumes time events and emits wave and spawn commands.
    ///
    /// Enemies appear just outside `viewport`.
    pub fn handle(
        &mut self,
        events: &[Event],
        play_mode: PlayMode,
        viewport: Viewport,
        out: &mut Vec<Command>,
    ) {
        if play_mode != PlayMode::Running {
            return;
        }

        let mut current = match self.current {
            Some(current) => current,
            None => self.begin(1, viewport, out),
        };

        let accumulated = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        if accumulated.is_zero() {
            return;
        }

        self.wave_elapsed = self.wave_elapsed.saturating_add(accumulated);
        self.spawn_accumulator = self.spawn_accumulator.saturating_add(accumulated);

        while !current.spawn_interval.is_zero() && self.spawn_accumulator >= current.spawn_interval
        {
            self.spawn_accumulator -= current.spawn_interval;
            for _ in 0..current.spawn_count {
                let kinds = roster(current.wave);
                let kind = kinds[self.rng.gen_range(0..kinds.len())];
                let position = self.spawn_position(viewport);
                out.push(Command::SpawnEnemy {
                    kind,
                    position,
                    scaling: current.scaling,
                });
            }
        }

        if self.config.wave_duration.is_zero() {
            return;
        }
        while self.wave_elapsed >= self.config.wave_duration {
            self.wave_elapsed -= self.config.wave_duration;
            current = self.begin(current.wave.saturating_add(1), viewport, out);
        }
    }

    fn begin(&mut self, wave: u32, viewport: Viewport, out: &mut Vec<Command>) -> WaveTransition {
        let next = transition(wave);
        self.current = Some(next);
        info!(
            wave,
            spawn_count = next.spawn_count,
            interval_secs = next.spawn_interval.as_secs_f32(),
            "wave advanced"
        );
        out.push(Command::BeginWave { wave });

        if let Some(boss) = next.boss {
            info!(wave, kind = ?boss.kind, hp_multiplier = boss.scaling.hp_multiplier, "boss scheduled");
            let position = self.spawn_position(viewport);
            out.push(Command::SpawnEnemy {
                kind: boss.kind,
                position,
                scaling: boss.scaling,
            });
        }
        next
    }

    /// Picks a random point on a random viewport edge, pushed outward by the
    /// spawn margin.
    fn spawn_position(&mut self, viewport: Viewport) -> Vec2 {
        let half = viewport.half_extents;
        let margin = self.config.spawn_margin;
        let along: f32 = self.rng.gen_range(-1.0..=1.0);
        let offset = match self.rng.gen_range(0..4) {
            0 => Vec2::new(along * half.x, half.y + margin),
            1 => Vec2::new(along * half.x, -half.y - margin),
            2 => Vec2::new(half.x + margin, along * half.y),
            _ => Vec2::new(-half.x - margin, along * half.y),
        };
        viewport.center + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_wave_uses_base_parameters() {
        let first = transition(1);
        assert_eq!(first.scaling, EnemyScaling::default());
        assert_eq!(first.spawn_count, 1);
        assert_eq!(first.spawn_interval, Duration::from_secs(2));
        assert!(first.boss.is_none());
    }

    #[test]
    fn scaling_follows_wave_formulas() {
        let ninth = transition(9);
        assert!((ninth.scaling.hp_multiplier - 3.0).abs() < 1e-5);
        assert!((ninth.scaling.damage_multiplier - 1.08_f32.powi(8)).abs() < 1e-4);
        assert_eq!(ninth.spawn_count, 5);
        assert!((ninth.spawn_interval.as_secs_f32() - 1.2).abs() < 1e-4);
    }

    #[test]
    fn spawn_count_and_interval_are_clamped() {
        let late = transition(60);
        assert_eq!(late.spawn_count, MAX_SPAWN_COUNT);
        assert!((late.spawn_interval.as_secs_f32() - MIN_SPAWN_INTERVAL).abs() < 1e-4);
    }

    #[test]
    fn boss_is_scheduled_only_on_fifth_waves() {
        assert!((1..5).all(|wave| transition(wave).boss.is_none()));
        let boss = transition(5).boss.expect("boss on wave five");
        assert_eq!(boss.kind, EnemyKind::Sentinel);
        assert!(transition(6).boss.is_none());
    }

    #[test]
    fn bosses_rotate_and_gain_prestige() {
        let kinds: Vec<_> = [5, 10, 15, 20]
            .into_iter()
            .filter_map(|wave| transition(wave).boss)
            .map(|boss| boss.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EnemyKind::Sentinel,
                EnemyKind::Behemoth,
                EnemyKind::Harbinger,
                EnemyKind::Sentinel,
            ]
        );

        let fifteen = transition(15);
        let twenty = transition(20);
        let prestige_of = |transition: WaveTransition| {
            transition.boss.map(|boss| {
                boss.scaling.hp_multiplier / transition.scaling.hp_multiplier
            })
        };
        assert!((prestige_of(fifteen).unwrap_or_default() - 1.0).abs() < 1e-5);
        assert!((prestige_of(twenty).unwrap_or_default() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn roster_grows_with_waves() {
        assert_eq!(roster(1), &[EnemyKind::Scout]);
        assert!(roster(2).contains(&EnemyKind::Grunt));
        assert!(roster(4).contains(&EnemyKind::Brute));
    }
}
