//! K-medoids (PAM-style) clustering.

use crate::cluster::distance::{self, DistanceMetric};
use crate::cluster::traits::Clustering;
use crate::error::{Error, Result};

/// K-medoids clustering around actual data points.
///
/// Medoids are seeded with the deterministic PAM BUILD procedure (greedily
/// adding the point that most reduces total assignment cost), then refined
/// by alternating assignment and per-cluster medoid sweeps until the medoid
/// set stops changing or `max_iter` is reached. There is no randomness:
/// identical inputs always produce identical labels.
///
/// Unlike the centroid algorithms, a `Pearson` request here is evaluated
/// with the [`binary`](crate::cluster::distance::binary) presence/absence
/// distance, the substitute this crate has always applied for correlation
/// on mixed or sparse attributes.
#[derive(Debug, Clone)]
pub struct Kmedoids {
    k: usize,
    metric: DistanceMetric,
    max_iter: usize,
}

impl Kmedoids {
    /// Create a k-medoids model targeting `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            metric: DistanceMetric::default(),
            max_iter: 100,
        }
    }

    /// Set the distance metric (default: Euclidean).
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the maximum refinement sweeps (default: 100).
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// PAM BUILD: start from the point with the lowest total distance to
    /// everything, then greedily add the point with the largest cost gain.
    fn build_medoids(&self, dists: &[f32], n: usize) -> Vec<usize> {
        let mut medoids = Vec::with_capacity(self.k);
        let mut first = 0;
        let mut first_cost = f32::INFINITY;
        for i in 0..n {
            let cost: f32 = dists[i * n..(i + 1) * n].iter().sum();
            if cost < first_cost {
                first_cost = cost;
                first = i;
            }
        }
        medoids.push(first);

        let mut nearest: Vec<f32> = dists[first * n..(first + 1) * n].to_vec();
        while medoids.len() < self.k {
            let mut best = first;
            let mut best_gain = f32::NEG_INFINITY;
            for c in 0..n {
                if medoids.contains(&c) {
                    continue;
                }
                let gain: f32 = nearest
                    .iter()
                    .zip(&dists[c * n..(c + 1) * n])
                    .map(|(&near, &d)| (near - d).max(0.0))
                    .sum();
                if gain > best_gain {
                    best_gain = gain;
                    best = c;
                }
            }
            for (near, &d) in nearest.iter_mut().zip(&dists[best * n..(best + 1) * n]) {
                *near = near.min(d);
            }
            medoids.push(best);
        }
        medoids
    }
}

impl Clustering for Kmedoids {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        let n = data.len();
        if self.k == 0 || self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
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

        let dists = distance::pairwise_matrix(data, kernel(self.metric));
        let mut medoids = self.build_medoids(&dists, n);
        let mut labels = vec![0usize; n];

        for _ in 0..self.max_iter {
            assign(&dists, n, &medoids, &mut labels);

            let mut changed = false;
            for (c, medoid) in medoids.iter_mut().enumerate() {
                let mut best_m = *medoid;
                let mut best_cost = f32::INFINITY;
                for i in 0..n {
                    if labels[i] != c {
                        continue;
                    }
                    let cost: f32 = (0..n)
                        .filter(|&j| labels[j] == c)
                        .map(|j| dists[i * n + j])
                        .sum();
                    if cost < best_cost {
                        best_cost = cost;
                        best_m = i;
                    }
                }
                if best_m != *medoid {
                    *medoid = best_m;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        assign(&dists, n, &medoids, &mut labels);
        Ok(labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Assign each point to its nearest medoid, lowest cluster index on ties.
fn assign(dists: &[f32], n: usize, medoids: &[usize], labels: &mut [usize]) {
    for (j, label) in labels.iter_mut().enumerate() {
        let mut best_c = 0;
        let mut best_d = f32::INFINITY;
        for (c, &m) in medoids.iter().enumerate() {
            let d = dists[m * n + j];
            if d < best_d {
                best_d = d;
                best_c = c;
            }
        }
        *label = best_c;
    }
}

fn kernel(metric: DistanceMetric) -> fn(&[f32], &[f32]) -> f32 {
    match metric {
        DistanceMetric::Euclidean => distance::euclidean,
        DistanceMetric::Manhattan => distance::manhattan,
        // correlation on mixed attributes runs on presence/absence instead
        DistanceMetric::Pearson => distance::binary,
    }
}
