//! Simulated price movement for the selected stock.
//!
//! A tick nudges `current_price` by up to ±2 and `change` by up to ±0.5. The
//! schedule is driven by the caller's event loop through [`PriceSimulator::poll`]
//! so every mutation happens on that loop, never concurrently with user input.

use crate::models::StockRecord;
use rand::Rng;
use std::time::{Duration, Instant};

/// Fixed time between ticks.
pub const TICK_PERIOD: Duration = Duration::from_millis(3000);

/// Scale applied to the price sample.
pub const PRICE_STEP: f64 = 2.0;

/// Scale applied to the change sample.
pub const CHANGE_STEP: f64 = 0.5;

/// Source of uniform samples in `[-1, 1)`.
pub trait Jitter {
    fn sample(&mut self) -> f64;
}

/// Jitter backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomJitter<R> {
    rng: R,
}

impl<R: Rng> RandomJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Jitter for RandomJitter<R> {
    fn sample(&mut self) -> f64 {
        self.rng.gen_range(-1.0..1.0)
    }
}

/// Apply one tick to `stock` given two unit samples.
///
/// Every field other than `current_price` and `change` is copied unchanged.
pub fn perturb(stock: &StockRecord, price_unit: f64, change_unit: f64) -> StockRecord {
    StockRecord {
        current_price: stock.current_price + price_unit * PRICE_STEP,
        change: stock.change + change_unit * CHANGE_STEP,
        ..stock.clone()
    }
}

/// Periodic, cancellable price perturbation.
#[derive(Debug)]
pub struct PriceSimulator<J> {
    jitter: J,
    period: Duration,
    next_due: Option<Instant>,
}

impl<J: Jitter> PriceSimulator<J> {
    /// Create a stopped simulator with the fixed tick period.
    pub fn new(jitter: J) -> Self {
        Self {
            jitter,
            period: TICK_PERIOD,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Schedule the first tick one period after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    /// Cancel the schedule. `poll` reports nothing until `start` is called again.
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Report whether a tick is due at `now`, advancing the schedule if so.
    ///
    /// At most one tick is reported per call. Periods missed while the caller
    /// was busy are skipped.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(mut due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        while due <= now {
            due += self.period;
        }
        self.next_due = Some(due);
        true
    }

    /// Time left until the next tick, or `None` when stopped.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Draw samples and produce the next version of `stock`.
    pub fn step(&mut self, stock: &StockRecord) -> StockRecord {
        let price_unit = self.jitter.sample();
        let change_unit = self.jitter.sample();
        perturb(stock, price_unit, change_unit)
    }
}
