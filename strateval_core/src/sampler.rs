//! Standard-normal noise sources.
//!
//! Every source owns its uniform generator and nothing else, so a sampler is
//! a pure function of its RNG stream: seed the RNG and the deviates repeat.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A source of approximately standard-normal deviates (mean 0, variance 1).
pub trait GaussianSource {
    /// Draws one deviate.
    fn sample(&mut self) -> f64;
}

/// Box-Muller transform over a uniform stream.
///
/// Draws u, v in [0, 1), redraws either one while it is exactly zero
/// (ln 0 is undefined) and returns `sqrt(-2 ln u) * cos(2πv)`.
pub struct BoxMuller<R> {
    rng: R,
}

impl<R: Rng> BoxMuller<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn open_unit(&mut self) -> f64 {
        loop {
            let x: f64 = self.rng.gen();
            if x != 0.0 {
                return x;
            }
        }
    }

    /// Consumes the sampler, returning the underlying RNG.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> GaussianSource for BoxMuller<R> {
    fn sample(&mut self) -> f64 {
        let u = self.open_unit();
        let v = self.open_unit();
        (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
    }
}

/// Ziggurat sampler backed by `rand_distr::StandardNormal`.
pub struct Ziggurat<R> {
    rng: R,
}

impl<R: Rng> Ziggurat<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> GaussianSource for Ziggurat<R> {
    fn sample(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

/// Which noise source a simulation unit builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerKind {
    #[default]
    BoxMuller,
    Ziggurat,
}

impl SamplerKind {
    pub fn name(&self) -> &'static str {
        match self {
            SamplerKind::BoxMuller => "box-muller",
            SamplerKind::Ziggurat => "ziggurat",
        }
    }
}

impl std::fmt::Display for SamplerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for SamplerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "box-muller" | "box_muller" | "boxmuller" => Ok(SamplerKind::BoxMuller),
            "ziggurat" => Ok(SamplerKind::Ziggurat),
            _ => Err(format!("Unknown sampler: {}", s)),
        }
    }
}
