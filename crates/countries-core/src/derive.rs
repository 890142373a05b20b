//! Estimated GDP derivation.
//!
//! `estimated_gdp = population × multiplier / exchange_rate`, where the
//! multiplier is an integer in `[1000, 2000]` drawn independently for every
//! country on every computation. The multiplier comes from a
//! [`GdpMultiplier`] so callers can swap the random draw for a fixed value.

use countries_types::Country;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Smallest multiplier a draw can produce.
pub const MIN_MULTIPLIER: u32 = 1000;

/// Largest multiplier a draw can produce.
pub const MAX_MULTIPLIER: u32 = 2000;

/// Source of the per-country GDP multiplier.
pub trait GdpMultiplier {
    /// Produce the multiplier for one country.
    fn draw(&mut self) -> u32;
}

/// Draws multipliers uniformly from `[MIN_MULTIPLIER, MAX_MULTIPLIER]`.
#[derive(Debug, Clone)]
pub struct RandomMultiplier<R> {
    rng: R,
}

impl<R: Rng> RandomMultiplier<R> {
    /// Wrap an existing random number generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomMultiplier<SmallRng> {
    /// A `Send` generator seeded from the thread-local RNG.
    pub fn from_thread_rng() -> Self {
        Self::new(SmallRng::from_rng(&mut rand::rng()))
    }
}

impl<R: Rng> GdpMultiplier for RandomMultiplier<R> {
    fn draw(&mut self) -> u32 {
        self.rng.random_range(MIN_MULTIPLIER..=MAX_MULTIPLIER)
    }
}

/// Always yields the same multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedMultiplier(pub u32);

impl GdpMultiplier for FixedMultiplier {
    fn draw(&mut self) -> u32 {
        self.0
    }
}

/// Compute the estimated GDP for one country.
///
/// Returns `0.0` without drawing when `currency_code` is empty or
/// `exchange_rate` is not strictly positive.
pub fn estimate_gdp(
    currency_code: &str,
    population: u64,
    exchange_rate: f64,
    multiplier: &mut impl GdpMultiplier,
) -> f64 {
    if currency_code.is_empty() || exchange_rate.is_nan() || exchange_rate <= 0.0 {
        return 0.0;
    }

    // Populations stay far below 2^53, so the conversion is exact.
    #[allow(clippy::cast_precision_loss)]
    let population = population as f64;

    population * f64::from(multiplier.draw()) / exchange_rate
}

/// Recompute `estimated_gdp` in place for every country.
pub fn rederive(countries: &mut [Country], multiplier: &mut impl GdpMultiplier) {
    for country in countries {
        country.estimated_gdp = estimate_gdp(
            &country.currency_code,
            country.population,
            country.exchange_rate,
            multiplier,
        );
    }
}
