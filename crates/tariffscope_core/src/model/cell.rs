use serde::{Deserialize, Serialize};

/// Relative delta reported when the reference value is zero
pub const ZERO_REFERENCE_RELATIVE_DELTA: f64 = 0.0;

/// One side of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

/// Which side a delta is measured against.
///
/// `AMinusB` reports A - B relative to B; `BMinusA` reports B - A relative to A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceMode {
    #[default]
    AMinusB,
    BMinusA,
}

impl ReferenceMode {
    pub fn toggled(self) -> Self {
        match self {
            ReferenceMode::AMinusB => ReferenceMode::BMinusA,
            ReferenceMode::BMinusA => ReferenceMode::AMinusB,
        }
    }

    /// Side whose value is the relative-delta denominator
    pub fn reference_side(self) -> Side {
        match self {
            ReferenceMode::AMinusB => Side::B,
            ReferenceMode::BMinusA => Side::A,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReferenceMode::AMinusB => "A - B (B → A)",
            ReferenceMode::BMinusA => "B - A (A → B)",
        }
    }
}

/// A (group, step) position where both tariffs carry a numeric value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub group: String,
    pub group_ordinal: Option<i64>,
    pub step: String,
    pub step_ordinal: Option<i64>,
    pub a: f64,
    pub b: f64,
}

impl Cell {
    pub fn value(&self, side: Side) -> f64 {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    /// Sort key placing steps without an ordinal last
    pub fn step_key(&self) -> i64 {
        self.step_ordinal.unwrap_or(i64::MAX)
    }
}

/// Signed difference of a cell and its percentage against the reference side
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Delta {
    pub abs: f64,
    pub rel: f64,
}
