use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-claim retention of an excess-of-loss layer, in the same currency unit
/// as claim sizes. The insurer keeps up to this amount of every claim; the
/// reinsurer pays the excess.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Retention(pub f64);

impl fmt::Display for Retention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Seed for the injected random source. Identical seeds give bit-identical runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(pub u64);
