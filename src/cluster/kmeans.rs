//! Centroid-based k-means clustering.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::cluster::distance::{self, DistanceMetric};
use crate::cluster::traits::Clustering;
use crate::error::{Error, Result};

/// K-means with k-means++ seeding, Lloyd iterations, and restarts.
///
/// Each restart draws fresh k-means++ seeds, iterates assignment and
/// centroid updates until assignments stop changing or `max_iter` is hit,
/// and the restart with the lowest inertia wins. With a fixed seed the
/// whole procedure is deterministic.
///
/// Centroids are coordinate means, so the algorithm is only truly
/// consistent with the Euclidean metric; a `Pearson` request is evaluated
/// with Euclidean distance (the long-standing behavior this crate keeps),
/// and `Manhattan` assigns by city-block distance against mean centroids.
///
/// # Example
///
/// ```
/// use concord::cluster::{Clustering, Kmeans};
///
/// let data = vec![
///     vec![0.0, 0.0],
///     vec![0.1, 0.0],
///     vec![5.0, 5.0],
///     vec![5.1, 5.0],
/// ];
/// let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[2]);
/// ```
#[derive(Debug, Clone)]
pub struct Kmeans {
    k: usize,
    metric: DistanceMetric,
    max_iter: usize,
    restarts: usize,
    seed: Option<u64>,
}

/// Result of a k-means fit.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Cluster centers, one row per cluster.
    pub centroids: Vec<Vec<f32>>,
    /// 0-based cluster label per input point.
    pub labels: Vec<usize>,
    /// Sum of squared point-to-centroid distances.
    pub inertia: f32,
    /// Lloyd iterations used by the winning restart.
    pub iterations: usize,
}

impl Kmeans {
    /// Create a k-means model targeting `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            metric: DistanceMetric::default(),
            max_iter: 100,
            restarts: 5,
            seed: None,
        }
    }

    /// Set the distance metric (default: Euclidean).
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the maximum Lloyd iterations per restart (default: 100).
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the number of seeded restarts (default: 5).
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Fix the random seed for reproducible fits.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fit the model and return centroids, labels, and inertia.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<KmeansFit> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        if self.k == 0 || self.k > data.len() {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: data.len(),
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if self.restarts == 0 {
            return Err(Error::InvalidParameter {
                name: "restarts",
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

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(rand::rng()),
        };
        let dist = kernel(self.metric);

        let mut best = self.run_once(data, dist, &mut rng);
        for _ in 1..self.restarts {
            let fit = self.run_once(data, dist, &mut rng);
            if fit.inertia < best.inertia {
                best = fit;
            }
        }
        Ok(best)
    }

    fn run_once(
        &self,
        data: &[Vec<f32>],
        dist: fn(&[f32], &[f32]) -> f32,
        rng: &mut dyn RngCore,
    ) -> KmeansFit {
        let centroids = self.seed_centroids(data, dist, rng);
        self.lloyd(data, dist, centroids)
    }

    /// K-means++ seeding: pick the first center uniformly, then each next
    /// center with probability proportional to its squared distance from
    /// the nearest center chosen so far.
    fn seed_centroids(
        &self,
        data: &[Vec<f32>],
        dist: fn(&[f32], &[f32]) -> f32,
        rng: &mut dyn RngCore,
    ) -> Vec<Vec<f32>> {
        let n = data.len();
        let mut centroids: Vec<Vec<f32>> = Vec::with_capacity(self.k);
        let mut min_d2 = vec![f32::INFINITY; n];
        let mut newest = data[rng.random_range(0..n)].clone();

        loop {
            for (d2, point) in min_d2.iter_mut().zip(data.iter()) {
                let d = dist(point, &newest);
                *d2 = d2.min(d * d);
            }
            centroids.push(newest);
            if centroids.len() == self.k {
                break;
            }

            let total: f32 = min_d2.iter().sum();
            let next = if total <= f32::EPSILON {
                // all remaining points coincide with a center
                rng.random_range(0..n)
            } else {
                let mut target = rng.random::<f32>() * total;
                let mut chosen = n - 1;
                for (i, &d2) in min_d2.iter().enumerate() {
                    target -= d2;
                    if target <= 0.0 {
                        chosen = i;
                        break;
                    }
                }
                chosen
            };
            newest = data[next].clone();
        }
        centroids
    }

    fn lloyd(
        &self,
        data: &[Vec<f32>],
        dist: fn(&[f32], &[f32]) -> f32,
        mut centroids: Vec<Vec<f32>>,
    ) -> KmeansFit {
        let n = data.len();
        let dim = data[0].len();
        let mut labels = vec![usize::MAX; n];
        let mut iterations = 0;

        for iter in 0..self.max_iter {
            iterations = iter + 1;
            let mut changed = false;

            for (label, point) in labels.iter_mut().zip(data.iter()) {
                let mut best = 0;
                let mut best_d = f32::INFINITY;
                for (c, centroid) in centroids.iter().enumerate() {
                    let d = dist(point, centroid);
                    if d < best_d {
                        best_d = d;
                        best = c;
                    }
                }
                if *label != best {
                    *label = best;
                    changed = true;
                }
            }
            if !changed {
                break;
            }

            let mut sums = vec![vec![0.0f32; dim]; self.k];
            let mut counts = vec![0usize; self.k];
            for (point, &label) in data.iter().zip(labels.iter()) {
                counts[label] += 1;
                for (s, &x) in sums[label].iter_mut().zip(point.iter()) {
                    *s += x;
                }
            }
            for c in 0..self.k {
                if counts[c] == 0 {
                    // reseed a starved cluster from the worst-fit point
                    let far = farthest_point(data, &centroids, &labels, dist);
                    centroids[c] = data[far].clone();
                } else {
                    for (out, s) in centroids[c].iter_mut().zip(sums[c].iter()) {
                        *out = s / counts[c] as f32;
                    }
                }
            }
        }

        let inertia = data
            .iter()
            .zip(labels.iter())
            .map(|(point, &label)| {
                let d = dist(point, &centroids[label]);
                d * d
            })
            .sum();
        KmeansFit {
            centroids,
            labels,
            inertia,
            iterations,
        }
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

fn kernel(metric: DistanceMetric) -> fn(&[f32], &[f32]) -> f32 {
    match metric {
        // correlation requests are evaluated with Euclidean geometry here
        DistanceMetric::Euclidean | DistanceMetric::Pearson => distance::euclidean,
        DistanceMetric::Manhattan => distance::manhattan,
    }
}

fn farthest_point(
    data: &[Vec<f32>],
    centroids: &[Vec<f32>],
    labels: &[usize],
    dist: fn(&[f32], &[f32]) -> f32,
) -> usize {
    let mut far = 0;
    let mut far_d = -1.0f32;
    for (i, (point, &label)) in data.iter().zip(labels.iter()).enumerate() {
        let d = dist(point, &centroids[label]);
        if d > far_d {
            far_d = d;
            far = i;
        }
    }
    far
}
