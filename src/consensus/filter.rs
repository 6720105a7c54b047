//! Exact-degree filtering of the consensus matrix.

use serde::{Deserialize, Serialize};

use crate::consensus::matrix::{ConsensusMatrix, NUM_ALGORITHMS};
use crate::error::{Error, Result};

/// Selection code meaning "no filtering" in the dashboard degree picker.
const ALL_CODE: u8 = NUM_ALGORITHMS as u8 + 1;

/// Restriction of the consensus matrix to a single agreement degree.
///
/// `Exactly(d)`, with `d` between 1 and [`NUM_ALGORITHMS`], keeps every
/// observation that shares at least one pair with exactly `d` agreeing
/// algorithms, restricts the matrix to those observations, and zeroes the
/// remaining cells whose count is not `d`. The filtered matrix therefore
/// contains only the values `d` and `0`. [`All`](DegreeFilter::All) keeps
/// the matrix untouched.
///
/// In configuration the filter round-trips through the dashboard's
/// selection codes: `1` through `4` mean `Exactly(code)` and `5` means
/// `All`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DegreeFilter {
    /// Keep every observation and every count.
    #[default]
    All,
    /// Keep only pairs with exactly this many agreeing algorithms.
    Exactly(u8),
}

impl DegreeFilter {
    /// Filter `matrix` down to this degree.
    ///
    /// An empty result is valid: no pair may have the requested degree.
    pub fn apply(&self, matrix: &ConsensusMatrix) -> Result<ConsensusMatrix> {
        let degree = match *self {
            DegreeFilter::All => return Ok(matrix.clone()),
            DegreeFilter::Exactly(degree) => degree,
        };
        if degree == 0 || usize::from(degree) > NUM_ALGORITHMS {
            return Err(Error::InvalidParameter {
                name: "degree",
                message: "exact degree must be between 1 and 4",
            });
        }

        let n = matrix.len();
        let keep: Vec<usize> = (0..n)
            .filter(|&i| (0..n).any(|j| j != i && matrix.get(i, j) == degree))
            .collect();

        let m = keep.len();
        let mut values = vec![0u8; m * m];
        for (new_i, &old_i) in keep.iter().enumerate() {
            for (new_j, &old_j) in keep.iter().enumerate() {
                if new_i != new_j && matrix.get(old_i, old_j) == degree {
                    values[new_i * m + new_j] = degree;
                }
            }
        }
        let ids = keep.iter().map(|&i| matrix.ids()[i].clone()).collect();
        Ok(ConsensusMatrix::from_parts(values, ids))
    }
}

impl TryFrom<u8> for DegreeFilter {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            ALL_CODE => Ok(Self::All),
            d if d >= 1 && usize::from(d) <= NUM_ALGORITHMS => Ok(Self::Exactly(d)),
            _ => Err(Error::InvalidParameter {
                name: "degree",
                message: "selection code must be between 1 and 5",
            }),
        }
    }
}

impl From<DegreeFilter> for u8 {
    fn from(filter: DegreeFilter) -> u8 {
        match filter {
            DegreeFilter::All => ALL_CODE,
            DegreeFilter::Exactly(d) => d,
        }
    }
}

impl std::str::FromStr for DegreeFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        let code: u8 = s.parse().map_err(|_| Error::InvalidParameter {
            name: "degree",
            message: "expected 1-5 or \"all\"",
        })?;
        Self::try_from(code)
    }
}

impl std::fmt::Display for DegreeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Exactly(d) => write!(f, "{d}"),
        }
    }
}
