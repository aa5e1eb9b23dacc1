//! Initial canvas positions for imported devices.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lower bound of the scatter square.
pub const SCATTER_MIN: f64 = 100.0;
/// Upper bound (exclusive) of the scatter square.
pub const SCATTER_MAX: f64 = 300.0;

/// Where imported devices land on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImportPlacement {
    /// Every device at the same point.
    Fixed { x: f64, y: f64 },
    /// Seeded pseudo-random points inside `[100, 300)²`, so imported devices
    /// are visible without stacking. The same seed yields the same points.
    Scattered { seed: u64 },
}

impl Default for ImportPlacement {
    fn default() -> Self {
        Self::Fixed { x: 200.0, y: 200.0 }
    }
}

impl ImportPlacement {
    pub(crate) fn placer(self) -> Placer {
        let rng = match self {
            Self::Fixed { .. } => None,
            Self::Scattered { seed } => Some(ChaCha8Rng::seed_from_u64(seed)),
        };
        Placer {
            placement: self,
            rng,
        }
    }
}

/// Yields successive positions for one import.
pub(crate) struct Placer {
    placement: ImportPlacement,
    rng: Option<ChaCha8Rng>,
}

impl Placer {
    pub(crate) fn next_position(&mut self) -> (f64, f64) {
        match (&self.placement, self.rng.as_mut()) {
            (ImportPlacement::Scattered { .. }, Some(rng)) => (
                rng.gen_range(SCATTER_MIN..SCATTER_MAX),
                rng.gen_range(SCATTER_MIN..SCATTER_MAX),
            ),
            (ImportPlacement::Fixed { x, y }, _) => (*x, *y),
            (ImportPlacement::Scattered { .. }, None) => (SCATTER_MIN, SCATTER_MIN),
        }
    }
}
