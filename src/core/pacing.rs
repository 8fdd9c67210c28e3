//! Pacing policies for batch scheduling.
//!
//! The orchestrator never calls the random number generator directly: all
//! batch sizing and delay decisions go through an injectable policy so
//! tests can substitute a deterministic, zero-delay implementation.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PacingConfig;

/// Decides batch sizes and the delays between units and batches
pub trait PacingPolicy: Send + Sync {
    /// Number of units for the next batch (independent draw per batch)
    fn batch_size(&mut self) -> usize;

    /// Delay between units within a batch
    fn unit_delay(&mut self) -> Duration;

    /// Delay between batches
    fn batch_delay(&mut self) -> Duration;
}

/// Uniform random pacing over configured bounds
pub struct RandomPacing {
    batch_size: (usize, usize),
    unit_delay_secs: (f64, f64),
    interval_minutes: (f64, f64),
    rng: StdRng,
}

impl RandomPacing {
    /// Create a policy from the configured bounds
    pub fn from_config(config: &PacingConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            unit_delay_secs: config.unit_delay_secs,
            interval_minutes: config.interval_minutes,
            rng: StdRng::from_entropy(),
        }
    }
}

impl PacingPolicy for RandomPacing {
    fn batch_size(&mut self) -> usize {
        let (min, max) = self.batch_size;
        self.rng.gen_range(min..=max.max(min))
    }

    fn unit_delay(&mut self) -> Duration {
        let (min, max) = self.unit_delay_secs;
        Duration::from_secs_f64(self.rng.gen_range(min..=max.max(min)))
    }

    fn batch_delay(&mut self) -> Duration {
        let (min, max) = self.interval_minutes;
        Duration::from_secs_f64(self.rng.gen_range(min..=max.max(min)) * 60.0)
    }
}

/// Fixed batch size with no delays, for tests and dry runs
pub struct FixedPacing {
    batch_size: usize,
}

impl FixedPacing {
    /// Create a zero-delay policy with a constant batch size
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size }
    }
}

impl PacingPolicy for FixedPacing {
    fn batch_size(&mut self) -> usize {
        self.batch_size
    }

    fn unit_delay(&mut self) -> Duration {
        Duration::ZERO
    }

    fn batch_delay(&mut self) -> Duration {
        Duration::ZERO
    }
}
