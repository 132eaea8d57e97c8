use derive_more::{AsRef, Deref, Display, From, Into};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Number of prizes revealed per draw.
pub const DRAW_SIZE: usize = 4;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct PrizeLabel(String);

crate::impl_string_newtype!(PrizeLabel);

impl From<&str> for PrizeLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A private copy of the caller's prize list plus the randomness used to
/// draw from it. The caller's list is never touched.
#[derive(Debug, Clone)]
pub struct PrizePool {
    prizes: Vec<PrizeLabel>,
    rng: StdRng,
}

impl PrizePool {
    pub fn new<S: AsRef<str>>(prizes: &[S]) -> Self {
        Self::with_rng(prizes, StdRng::from_os_rng())
    }

    /// Deterministic pool, for reproducible draws.
    pub fn seeded<S: AsRef<str>>(prizes: &[S], seed: u64) -> Self {
        Self::with_rng(prizes, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<S: AsRef<str>>(prizes: &[S], rng: StdRng) -> Self {
        Self {
            prizes: prizes
                .iter()
                .map(|p| PrizeLabel::new(p.as_ref()))
                .collect(),
            rng,
        }
    }

    pub fn prizes(&self) -> &[PrizeLabel] {
        &self.prizes
    }

    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    /// Shuffles a copy of the pool and keeps the first [`DRAW_SIZE`] entries.
    ///
    /// Pools smaller than the draw size yield every prize once, in shuffled
    /// order; nothing is padded or repeated.
    pub fn draw(&mut self) -> Vec<PrizeLabel> {
        let mut shuffled = self.prizes.clone();
        shuffled.shuffle(&mut self.rng);
        shuffled.truncate(DRAW_SIZE);
        shuffled
    }
}
