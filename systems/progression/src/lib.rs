#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns level-ups into module offers.

use hexbound_core::{CellColor, Command, Event, HexCoord, ModuleChoice};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the progression system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of modules offered per level-up.
    pub choices: usize,
    /// Seed of the offer generator.
    pub rng_seed: u64,
}

impl Config {
    /// Creates a configuration offering three modules per level.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            choices: 3,
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Progression system drawing random module offers.
#[derive(Debug)]
pub struct Progression {
    choices: usize,
    rng: ChaCha8Rng,
}

impl Progression {
    /// Creates the progression system from the provided configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            choices: config.choices,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits one `Command::OfferModules` per level reached.
    ///
    /// Each offer holds distinct sites drawn from `sites`, every one paired
    /// with a random color.
    pub fn handle(&mut self, events: &[Event], sites: &[HexCoord], out: &mut Vec<Command>) {
        if sites.is_empty() || self.choices == 0 {
            return;
        }

        for event in events {
            if let Event::LevelReached { .. } = event {
                let picked: Vec<HexCoord> = sites
                    .choose_multiple(&mut self.rng, self.choices)
                    .copied()
                    .collect();
                let choices = picked
                    .into_iter()
                    .map(|coord| ModuleChoice {
                        coord,
                        color: CellColor::ALL[self.rng.gen_range(0..CellColor::COUNT)],
                    })
                    .collect();
                out.push(Command::OfferModules { choices });
            }
        }
    }
}
