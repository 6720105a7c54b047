//! The consensus (co-occurrence) matrix.

use crate::error::{Error, Result};

/// Number of clustering algorithms that vote into the consensus matrix.
pub const NUM_ALGORITHMS: usize = 4;

/// Display names of the four algorithms, index-aligned with
/// [`LabelSet::algorithms`].
pub const ALGORITHM_NAMES: [&str; NUM_ALGORITHMS] =
    ["kmeans", "hierarchical", "kmedoids", "spectral"];

/// One label vector per algorithm, all over the same observations.
///
/// The algorithm order is fixed: k-means, hierarchical, k-medoids,
/// spectral. Labels only ever feed equality comparisons, so any labeling
/// base works as long as each vector is internally consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    /// Labels from centroid k-means.
    pub kmeans: Vec<usize>,
    /// Labels from agglomerative clustering.
    pub hierarchical: Vec<usize>,
    /// Labels from k-medoids.
    pub kmedoids: Vec<usize>,
    /// Labels from spectral clustering.
    pub spectral: Vec<usize>,
}

impl LabelSet {
    /// The four label vectors in their fixed algorithm order.
    pub fn algorithms(&self) -> [&[usize]; NUM_ALGORITHMS] {
        [
            &self.kmeans,
            &self.hierarchical,
            &self.kmedoids,
            &self.spectral,
        ]
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.kmeans.len()
    }

    /// Whether there are no observations.
    pub fn is_empty(&self) -> bool {
        self.kmeans.is_empty()
    }
}

/// Symmetric observation-by-observation agreement counts.
///
/// Entry `(i, j)` is the number of algorithms (0 through
/// [`NUM_ALGORITHMS`]) that put observations `i` and `j` in the same
/// cluster. The diagonal is always zero; self-agreement carries no
/// information. Values are stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusMatrix {
    n: usize,
    values: Vec<u8>,
    ids: Vec<String>,
}

impl ConsensusMatrix {
    /// Count pairwise agreement across the four label vectors.
    ///
    /// All four vectors must have the same length. When `ids` is `None`,
    /// observations are named `"1"` through `"N"` in input order. Fewer
    /// than two observations yield a well-formed matrix with no pairs to
    /// count.
    pub fn from_labels(labels: &LabelSet, ids: Option<&[String]>) -> Result<Self> {
        let n = labels.len();
        for algorithm in labels.algorithms() {
            if algorithm.len() != n {
                return Err(Error::InconsistentLabels {
                    expected: n,
                    found: algorithm.len(),
                });
            }
        }
        let ids = match ids {
            Some(ids) if ids.len() != n => {
                return Err(Error::DimensionMismatch {
                    expected: n,
                    found: ids.len(),
                })
            }
            Some(ids) => ids.to_vec(),
            None => (1..=n).map(|i| i.to_string()).collect(),
        };

        let mut values = vec![0u8; n * n];
        for algorithm in labels.algorithms() {
            for i in 0..n {
                for j in (i + 1)..n {
                    if algorithm[i] == algorithm[j] {
                        values[i * n + j] += 1;
                        values[j * n + i] += 1;
                    }
                }
            }
        }
        Ok(Self { n, values, ids })
    }

    pub(crate) fn from_parts(values: Vec<u8>, ids: Vec<String>) -> Self {
        let n = ids.len();
        debug_assert_eq!(values.len(), n * n);
        Self { n, values, ids }
    }

    /// Number of observations (matrix side length).
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the matrix covers no observations.
    ///
    /// An empty matrix is a legitimate outcome of degree filtering, not
    /// an error state.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Agreement count for the pair `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.values[i * self.n + j]
    }

    /// The raw row-major agreement counts.
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Observation identifiers, in row order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Apply the same permutation to rows, columns, and ids.
    ///
    /// `order[new_index] = old_index`; it must be a permutation of
    /// `0..len()`.
    pub fn permuted(&self, order: &[usize]) -> Result<Self> {
        if order.len() != self.n {
            return Err(Error::DimensionMismatch {
                expected: self.n,
                found: order.len(),
            });
        }
        let mut seen = vec![false; self.n];
        for &idx in order {
            if idx >= self.n || seen[idx] {
                return Err(Error::InvalidParameter {
                    name: "order",
                    message: "must be a permutation of the row indices",
                });
            }
            seen[idx] = true;
        }

        let mut values = vec![0u8; self.n * self.n];
        for (new_i, &old_i) in order.iter().enumerate() {
            for (new_j, &old_j) in order.iter().enumerate() {
                values[new_i * self.n + new_j] = self.values[old_i * self.n + old_j];
            }
        }
        let ids = order.iter().map(|&i| self.ids[i].clone()).collect();
        Ok(Self::from_parts(values, ids))
    }

    /// View the agreement counts as a dense affinity for spectral methods.
    pub fn to_affinity(&self) -> Vec<Vec<f32>> {
        (0..self.n)
            .map(|i| {
                self.values[i * self.n..(i + 1) * self.n]
                    .iter()
                    .map(|&v| f32::from(v))
                    .collect()
            })
            .collect()
    }
}
