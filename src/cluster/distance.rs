//! Distance metrics shared by the partitional and hierarchical algorithms.
//!
//! The dashboard exposes three metric choices; each algorithm maps a choice
//! to the kernel it actually evaluates, so a `pearson` request does not
//! always mean correlation distance (see the per-algorithm docs).

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// User-selectable distance metric.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// Correlation distance `1 - r`.
    Pearson,
    /// City-block distance.
    Manhattan,
}

impl std::str::FromStr for DistanceMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Self::Euclidean),
            "pearson" => Ok(Self::Pearson),
            "manhattan" => Ok(Self::Manhattan),
            _ => Err(Error::InvalidParameter {
                name: "distance",
                message: "expected euclidean, pearson, or manhattan",
            }),
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Euclidean => "euclidean",
            Self::Pearson => "pearson",
            Self::Manhattan => "manhattan",
        };
        f.write_str(s)
    }
}

#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean distance between two points.
#[inline]
pub fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    squared_euclidean(a, b).sqrt()
}

/// Manhattan (city-block) distance between two points.
#[inline]
pub fn manhattan(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// Pearson correlation distance `1 - r`.
///
/// Constant vectors have undefined correlation; they are treated as
/// uncorrelated with everything (distance 1).
pub fn pearson(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len() as f64;
    if a.is_empty() {
        return 0.0;
    }

    let mean_a = a.iter().map(|&x| f64::from(x)).sum::<f64>() / n;
    let mean_b = b.iter().map(|&x| f64::from(x)).sum::<f64>() / n;

    let mut cov = 0.0f64;
    let mut var_a = 0.0f64;
    let mut var_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let dx = f64::from(x) - mean_a;
        let dy = f64::from(y) - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a <= f64::EPSILON || var_b <= f64::EPSILON {
        return 1.0;
    }
    (1.0 - cov / (var_a * var_b).sqrt()) as f32
}

/// Binary (presence/absence) distance: the share of attributes where
/// exactly one of the two points is nonzero, among attributes where at
/// least one is.
///
/// This is the mixed-data substitute the medoid algorithm applies when a
/// correlation metric is requested.
pub fn binary(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let mut either = 0usize;
    let mut differ = 0usize;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let px = x != 0.0;
        let py = y != 0.0;
        if px || py {
            either += 1;
            if px != py {
                differ += 1;
            }
        }
    }
    if either == 0 {
        0.0
    } else {
        differ as f32 / either as f32
    }
}

/// Compute the full symmetric pairwise distance matrix, stored row-major.
pub(crate) fn pairwise_matrix(data: &[Vec<f32>], dist: fn(&[f32], &[f32]) -> f32) -> Vec<f32> {
    let n = data.len();
    let mut dists = vec![0.0f32; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = dist(&data[i], &data[j]);
            dists[i * n + j] = d;
            dists[j * n + i] = d;
        }
    }
    dists
}
