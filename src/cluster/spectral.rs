//! Spectral clustering on an RBF or caller-supplied affinity.

use rand::Rng;

use crate::cluster::distance;
use crate::cluster::kmeans::Kmeans;
use crate::cluster::traits::Clustering;
use crate::error::{Error, Result};
use crate::linalg;

/// Spectral clustering in the normalized (Ng-Jordan-Weiss) formulation.
///
/// Feature input is turned into an RBF affinity
/// `exp(-gamma * ||x_i - x_j||^2)` with a zero diagonal; a precomputed
/// symmetric affinity can be supplied instead via
/// [`fit_predict_affinity`](Spectral::fit_predict_affinity). The affinity
/// is normalized as `D^{-1/2} A D^{-1/2}`, its leading `k` eigenvectors
/// form a row-normalized embedding, and the embedding rows are clustered
/// with this crate's [`Kmeans`].
///
/// Eigenvectors come from power iteration with deflation; the normalized
/// matrix is shifted by the identity first so the algebraically largest
/// eigenvalues also have the largest magnitude.
#[derive(Debug, Clone)]
pub struct Spectral {
    k: usize,
    gamma: f32,
    max_iter: usize,
    seed: Option<u64>,
}

impl Spectral {
    /// Create a spectral model targeting `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            gamma: 1.0,
            max_iter: 100,
            seed: None,
        }
    }

    /// Set the RBF width parameter (default: 1.0).
    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the maximum iterations of the embedding k-means (default: 100).
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Fix the random seed for reproducible fits.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cluster rows of a precomputed symmetric affinity matrix.
    ///
    /// Larger entries mean more similar; the matrix is used as given,
    /// diagonal included. An all-zero affinity carries no structure and
    /// collapses to a single cluster.
    pub fn fit_predict_affinity(&self, affinity: &[Vec<f32>]) -> Result<Vec<usize>> {
        if affinity.is_empty() {
            return Err(Error::EmptyInput);
        }
        let n = affinity.len();
        if self.k == 0 || self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        for row in affinity {
            if row.len() != n {
                return Err(Error::DimensionMismatch {
                    expected: n,
                    found: row.len(),
                });
            }
        }
        if self.k == n {
            return Ok((0..n).collect());
        }

        // degree vector; an all-zero affinity has no structure to split
        let degrees: Vec<f64> = affinity
            .iter()
            .map(|row| row.iter().map(|&a| f64::from(a)).sum())
            .collect();
        if degrees.iter().all(|&d| d <= 1e-12) {
            return Ok(vec![0; n]);
        }
        let inv_sqrt: Vec<f64> = degrees
            .iter()
            .map(|&d| if d > 1e-12 { 1.0 / d.sqrt() } else { 0.0 })
            .collect();

        // shifted normalized affinity: D^{-1/2} A D^{-1/2} + I
        let mut m = vec![0.0f64; n * n];
        for i in 0..n {
            for j in 0..n {
                m[i * n + j] = f64::from(affinity[i][j]) * inv_sqrt[i] * inv_sqrt[j];
            }
            m[i * n + i] += 1.0;
        }

        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        let pairs = linalg::top_eigenpairs(&m, n, self.k, seed);

        // embedding: one row per point, one column per eigenvector
        let mut embedding = vec![vec![0.0f32; self.k]; n];
        for (c, (_, vector)) in pairs.iter().enumerate() {
            for (i, &x) in vector.iter().enumerate() {
                embedding[i][c] = x as f32;
            }
        }
        for row in embedding.iter_mut() {
            let norm: f32 = row.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 1e-12 {
                for x in row.iter_mut() {
                    *x /= norm;
                }
            }
        }

        Kmeans::new(self.k)
            .with_max_iter(self.max_iter)
            .with_seed(seed.wrapping_add(1))
            .fit_predict(&embedding)
    }
}

impl Clustering for Spectral {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        if !(self.gamma > 0.0 && self.gamma.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "gamma",
                message: "must be positive and finite",
            });
        }
        let dim = data[0].len();
        for row in data {
            if row.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: row.len(),
                });
            }
        }

        let n = data.len();
        let mut affinity = vec![vec![0.0f32; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let a = (-self.gamma * distance::squared_euclidean(&data[i], &data[j])).exp();
                affinity[i][j] = a;
                affinity[j][i] = a;
            }
        }
        self.fit_predict_affinity(&affinity)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Vec<f32>> {
        vec![
            vec![0.0, 0.0],
            vec![0.2, 0.1],
            vec![0.1, 0.3],
            vec![8.0, 8.0],
            vec![8.2, 7.9],
            vec![7.9, 8.1],
        ]
    }

    #[test]
    fn separates_two_obvious_blobs() {
        let labels = Spectral::new(2)
            .with_seed(42)
            .fit_predict(&two_blobs())
            .unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn block_diagonal_affinity_recovers_the_blocks() {
        let affinity = vec![
            vec![0.0, 1.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0, 0.0],
        ];
        let labels = Spectral::new(2)
            .with_seed(7)
            .fit_predict_affinity(&affinity)
            .unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn zero_affinity_collapses_to_one_cluster() {
        let affinity = vec![vec![0.0f32; 4]; 4];
        let labels = Spectral::new(2)
            .with_seed(1)
            .fit_predict_affinity(&affinity)
            .unwrap();
        assert_eq!(labels, vec![0, 0, 0, 0]);
    }

    #[test]
    fn k_equal_to_n_returns_identity_labels() {
        let affinity = vec![
            vec![0.0, 0.5, 0.5],
            vec![0.5, 0.0, 0.5],
            vec![0.5, 0.5, 0.0],
        ];
        let labels = Spectral::new(3)
            .with_seed(3)
            .fit_predict_affinity(&affinity)
            .unwrap();
        assert_eq!(labels, vec![0, 1, 2]);
    }

    #[test]
    fn seeded_fits_are_deterministic() {
        let data = two_blobs();
        let a = Spectral::new(2).with_seed(5).fit_predict(&data).unwrap();
        let b = Spectral::new(2).with_seed(5).fit_predict(&data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_empty_input() {
        let result = Spectral::new(2).fit_predict(&[]);
        assert!(matches!(result, Err(Error::EmptyInput)));
    }

    #[test]
    fn rejects_nonpositive_gamma() {
        let result = Spectral::new(2)
            .with_gamma(0.0)
            .fit_predict(&two_blobs());
        assert!(matches!(
            result,
            Err(Error::InvalidParameter { name: "gamma", .. })
        ));
    }

    #[test]
    fn rejects_more_clusters_than_points() {
        let affinity = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let result = Spectral::new(3).fit_predict_affinity(&affinity);
        assert!(matches!(result, Err(Error::InvalidClusterCount { .. })));
    }

    #[test]
    fn rejects_non_square_affinity() {
        let affinity = vec![vec![0.0, 1.0], vec![1.0]];
        let result = Spectral::new(1).fit_predict_affinity(&affinity);
        assert!(matches!(
            result,
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        ));
    }
}
