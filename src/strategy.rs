//! Placement strategy selection

use core::fmt;
use core::str::FromStr;

use crate::error::MemoryError;

/// Placement strategy for servicing allocation requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// First fit - first free block large enough, in list order
    FirstFit,
    /// Best fit - smallest sufficient free block
    BestFit,
    /// Worst fit - largest sufficient free block
    WorstFit,
    /// Next fit - first sufficient free block after the last allocation,
    /// scanning circularly
    NextFit,
}

impl Strategy {
    /// All strategies, in a fixed order convenient for comparison runs
    pub const ALL: [Strategy; 4] = [
        Strategy::FirstFit,
        Strategy::BestFit,
        Strategy::WorstFit,
        Strategy::NextFit,
    ];

    /// Short name, as accepted by [`FromStr`]
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FirstFit => "first",
            Self::BestFit => "best",
            Self::WorstFit => "worst",
            Self::NextFit => "next",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::FirstFit),
            "best" => Ok(Self::BestFit),
            "worst" => Ok(Self::WorstFit),
            "next" => Ok(Self::NextFit),
            other => Err(MemoryError::invalid_argument(format!(
                "unknown strategy '{other}' (expected one of: first, best, worst, next)"
            ))),
        }
    }
}
