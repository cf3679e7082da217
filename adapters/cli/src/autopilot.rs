//! Scripted pilot used for headless runs.

use std::time::Duration;

use glam::Vec2;
use hexbound_core::{CellColor, ModuleChoice};
use hexbound_session::{AimTarget, FrameInput, RunSummary, Session, ShipMutation, TerminalEvent};
use tracing::{debug, info};

/// Radians the steering direction turns per second.
const TURN_RATE: f32 = 0.6;

/// Steers in a slow circle, fires at the nearest enemy and takes the first
/// red module of every offer.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    heading: f32,
}

impl Autopilot {
    /// Produces the input for the next frame.
    pub(crate) fn input(&mut self, dt: Duration) -> FrameInput {
        self.heading = (self.heading + TURN_RATE * dt.as_secs_f32()) % std::f32::consts::TAU;
        FrameInput {
            movement: Vec2::from_angle(self.heading),
            aim: AimTarget::NearestEnemy,
            fire: true,
        }
    }

    /// Index of the preferred module within `offer`.
    pub(crate) fn choose(&self, offer: &[ModuleChoice]) -> usize {
        offer
            .iter()
            .position(|choice| choice.color == CellColor::Red)
            .unwrap_or(0)
    }
}

/// Outcome of a headless run.
#[derive(Debug)]
pub(crate) struct Outcome {
    pub(crate) frames: u64,
    pub(crate) ended: bool,
    pub(crate) summary: RunSummary,
}

/// Drives `session` for at most `frames` fixed steps of `dt`.
pub(crate) fn run(session: &mut Session, frames: u64, dt: Duration) -> Outcome {
    let mut pilot = Autopilot::default();
    for frame in 0..frames {
        if let Some(offer) = session.snapshot().pending_offer {
            let index = pilot.choose(&offer);
            debug!(frame, index, "selecting offered module");
            session.queue_mutation(ShipMutation::SelectOffer { index });
        }
        if let Some(TerminalEvent::RunEnded(summary)) = session.tick(pilot.input(dt), dt) {
            info!(frame, score = summary.score, "autopilot run ended");
            return Outcome {
                frames: frame + 1,
                ended: true,
                summary,
            };
        }
    }
    Outcome {
        frames,
        ended: false,
        summary: session.summary(),
    }
}
