//! Random Sources
//!
//! Every sampling call in a cycle draws from one `UnitSource`, threaded
//! through explicitly. Generators yield `next_u32() / 2^32`, which is exactly
//! the Mulberry32 float contract, so seeded runs are reproducible bit for bit.
//! Injected samplers hand their values through untouched.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use std::f64::consts::PI;

const TWO_POW_32: f64 = 4_294_967_296.0;

/// A stream of uniform draws in [0, 1).
pub trait UnitSource {
    fn unit(&mut self) -> f64;
}

fn unit_from_u32(value: u32) -> f64 {
    f64::from(value) / TWO_POW_32
}

/// Mulberry32: a tiny 32-bit generator with a well-known float sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        fill_from_u32(self, dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// Adapts an injected `FnMut() -> f64` (values in [0, 1)) to `UnitSource`.
///
/// In-range values pass through exactly. NaN and negatives become 0 and
/// anything at or above 1 becomes the largest double below 1.
pub struct FnSource<F: FnMut() -> f64> {
    source: F,
}

impl<F: FnMut() -> f64> FnSource<F> {
    pub fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F: FnMut() -> f64> UnitSource for FnSource<F> {
    fn unit(&mut self) -> f64 {
        let value = (self.source)();
        if value.is_nan() || value <= 0.0 {
            0.0
        } else if value >= 1.0 {
            1.0 - f64::EPSILON / 2.0
        } else {
            value
        }
    }
}

impl UnitSource for Mulberry32 {
    fn unit(&mut self) -> f64 {
        unit_from_u32(self.next_u32())
    }
}

impl UnitSource for SmallRng {
    fn unit(&mut self) -> f64 {
        unit_from_u32(self.next_u32())
    }
}

fn fill_from_u32<R: RngCore + ?Sized>(rng: &mut R, dest: &mut [u8]) {
    for chunk in dest.chunks_mut(4) {
        let bytes = rng.next_u32().to_le_bytes();
        chunk.copy_from_slice(&bytes[..chunk.len()]);
    }
}

/// Boxed injected sampler, as held by the orchestrator.
pub type InjectedFn = Box<dyn FnMut() -> f64 + Send>;

/// Which source a cycle resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngChoice {
    Injected,
    Seeded(u32),
    Entropy,
}

/// Per-cycle seed derived from a base seed and the cycle counter.
pub fn cycle_seed(seed: u32, cycle: u64) -> u32 {
    seed ^ (cycle as u32).wrapping_mul(0x9E37_79B9)
}

/// Resolves the cycle's random source: injected function, then seed, then entropy.
pub fn resolve_rng<'a>(
    injected: Option<&'a mut InjectedFn>,
    seed: Option<u32>,
    cycle: u64,
) -> (Box<dyn UnitSource + 'a>, RngChoice) {
    if let Some(f) = injected {
        return (Box::new(FnSource::new(move || f())), RngChoice::Injected);
    }
    if let Some(seed) = seed {
        let derived = cycle_seed(seed, cycle);
        return (Box::new(Mulberry32::new(derived)), RngChoice::Seeded(derived));
    }
    (Box::new(SmallRng::from_entropy()), RngChoice::Entropy)
}

/// Uniform draw in [0, 1).
pub fn unit(rng: &mut dyn UnitSource) -> f64 {
    rng.unit()
}

/// Uniform draw in [lo, hi).
pub fn range(rng: &mut dyn UnitSource, lo: f64, hi: f64) -> f64 {
    lo + unit(rng) * (hi - lo)
}

/// Standard normal via Box-Muller; consumes exactly two draws.
pub fn standard_normal(rng: &mut dyn UnitSource) -> f64 {
    let u1 = unit(rng).max(1e-12);
    let u2 = unit(rng);
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Cumulative-weight pick; one draw. Returns `None` if every weight is zero
/// or the draw lands past the end through rounding.
pub fn weighted_index(rng: &mut dyn UnitSource, weights: &[f64]) -> Option<usize> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    let r = unit(rng) * total;
    if total <= 0.0 {
        return None;
    }
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        if r < cumulative {
            return Some(i);
        }
    }
    None
}

/// Deterministic scripted source for tests and replays: cycles through values.
pub fn scripted(values: Vec<f64>) -> InjectedFn {
    let mut index = 0usize;
    Box::new(move || {
        if values.is_empty() {
            return 0.5;
        }
        let v = values[index % values.len()];
        index += 1;
        v
    })
}
