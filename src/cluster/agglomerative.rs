//! Agglomerative (bottom-up) hierarchical clustering.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cluster::distance::{self, DistanceMetric};
use crate::cluster::traits::Clustering;
use crate::error::{Error, Result};

/// How the distance between two merged clusters is defined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    /// Distance between the closest pair of members.
    Single,
    /// Distance between the farthest pair of members.
    Complete,
    /// Size-weighted mean of member distances.
    #[default]
    Average,
}

impl std::str::FromStr for Linkage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "complete" => Ok(Self::Complete),
            "average" => Ok(Self::Average),
            _ => Err(Error::InvalidParameter {
                name: "linkage",
                message: "expected single, complete, or average",
            }),
        }
    }
}

impl std::fmt::Display for Linkage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Single => "single",
            Self::Complete => "complete",
            Self::Average => "average",
        };
        f.write_str(s)
    }
}

/// One step of the agglomeration.
///
/// Clusters are identified by the smallest original observation index they
/// contain, which stays stable as merging proceeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// Representatives of the two merged clusters, smaller first.
    pub clusters: (usize, usize),
    /// Linkage distance at which the merge happened.
    pub distance: f32,
}

/// Flat labels plus the merge history that produced them.
#[derive(Debug, Clone)]
pub struct AgglomerativeFit {
    /// 0-based cluster label per input point, numbered in first-occurrence
    /// order.
    pub labels: Vec<usize>,
    /// The `n - k` merges, in the order they happened.
    pub merges: Vec<Merge>,
}

/// Agglomerative clustering cut at a fixed number of clusters.
///
/// Every point starts as its own cluster; the closest pair of clusters is
/// merged repeatedly (Lance-Williams updates for the chosen [`Linkage`])
/// until `k` clusters remain. The procedure is fully deterministic.
///
/// As with [`Kmeans`](crate::cluster::Kmeans), a `Pearson` metric request
/// is evaluated with Euclidean distance between points.
#[derive(Debug, Clone)]
pub struct Agglomerative {
    k: usize,
    linkage: Linkage,
    metric: DistanceMetric,
}

impl Agglomerative {
    /// Create a model that cuts the merge tree at `k` clusters.
    pub fn new(k: usize, linkage: Linkage) -> Self {
        Self {
            k,
            linkage,
            metric: DistanceMetric::default(),
        }
    }

    /// Set the distance metric (default: Euclidean).
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Fit the model, returning labels and the merge history.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<AgglomerativeFit> {
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
        let dim = data[0].len();
        for row in data {
            if row.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: row.len(),
                });
            }
        }

        let dist = kernel(self.metric);
        let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
        let mut reps: Vec<usize> = (0..n).collect();
        let mut dists: Vec<Vec<f32>> = (0..n)
            .map(|i| (0..n).map(|j| dist(&data[i], &data[j])).collect())
            .collect();
        let mut merges = Vec::with_capacity(n - self.k);

        while members.len() > self.k {
            // closest active pair, first wins on ties
            let m = members.len();
            let (mut a, mut b) = (0, 1);
            let mut best = f32::INFINITY;
            for i in 0..m {
                for j in (i + 1)..m {
                    if dists[i][j] < best {
                        best = dists[i][j];
                        a = i;
                        b = j;
                    }
                }
            }

            let (size_a, size_b) = (members[a].len(), members[b].len());
            for c in 0..m {
                if c == a || c == b {
                    continue;
                }
                let d = self.merge_distance(dists[a][c], dists[b][c], size_a, size_b);
                dists[a][c] = d;
                dists[c][a] = d;
            }

            let (lo, hi) = if reps[a] <= reps[b] {
                (reps[a], reps[b])
            } else {
                (reps[b], reps[a])
            };
            merges.push(Merge {
                clusters: (lo, hi),
                distance: best,
            });
            reps[a] = lo;

            let absorbed = members.swap_remove(b);
            members[a].extend(absorbed);
            reps.swap_remove(b);
            dists.swap_remove(b);
            for row in dists.iter_mut() {
                row.swap_remove(b);
            }
        }

        let mut labels = vec![0usize; n];
        for (cluster, m) in members.iter().enumerate() {
            for &i in m {
                labels[i] = cluster;
            }
        }
        // renumber so labels appear in first-occurrence order
        let mut remap: HashMap<usize, usize> = HashMap::new();
        for label in labels.iter_mut() {
            let next = remap.len();
            *label = *remap.entry(*label).or_insert(next);
        }
        Ok(AgglomerativeFit { labels, merges })
    }

    fn merge_distance(&self, d_ac: f32, d_bc: f32, size_a: usize, size_b: usize) -> f32 {
        match self.linkage {
            Linkage::Single => d_ac.min(d_bc),
            Linkage::Complete => d_ac.max(d_bc),
            Linkage::Average => {
                let (na, nb) = (size_a as f32, size_b as f32);
                (na * d_ac + nb * d_bc) / (na + nb)
            }
        }
    }
}

impl Clustering for Agglomerative {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

fn kernel(metric: DistanceMetric) -> fn(&[f32], &[f32]) -> f32 {
    match metric {
        DistanceMetric::Euclidean | DistanceMetric::Pearson => distance::euclidean,
        DistanceMetric::Manhattan => distance::manhattan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Vec<Vec<f32>> {
        // four equally spaced points on a line
        vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]]
    }

    #[test]
    fn complete_linkage_splits_the_chain_evenly() {
        let labels = Agglomerative::new(2, Linkage::Complete)
            .fit_predict(&chain())
            .unwrap();
        assert_eq!(labels, vec![0, 0, 1, 1]);
    }

    #[test]
    fn single_linkage_chains_through_neighbors() {
        let labels = Agglomerative::new(2, Linkage::Single)
            .fit_predict(&chain())
            .unwrap();
        assert_eq!(labels, vec![0, 0, 0, 1]);
    }

    #[test]
    fn average_linkage_splits_the_chain_evenly() {
        let labels = Agglomerative::new(2, Linkage::Average)
            .fit_predict(&chain())
            .unwrap();
        assert_eq!(labels, vec![0, 0, 1, 1]);
    }

    #[test]
    fn k_equal_to_n_leaves_every_point_alone() {
        let fit = Agglomerative::new(4, Linkage::Average)
            .fit(&chain())
            .unwrap();
        assert_eq!(fit.labels, vec![0, 1, 2, 3]);
        assert!(fit.merges.is_empty());
    }

    #[test]
    fn k_of_one_merges_everything() {
        let labels = Agglomerative::new(1, Linkage::Single)
            .fit_predict(&chain())
            .unwrap();
        assert_eq!(labels, vec![0, 0, 0, 0]);
    }

    #[test]
    fn merge_history_tracks_representatives_and_distances() {
        let fit = Agglomerative::new(1, Linkage::Complete)
            .fit(&chain())
            .unwrap();
        assert_eq!(
            fit.merges,
            vec![
                Merge {
                    clusters: (0, 1),
                    distance: 1.0
                },
                Merge {
                    clusters: (2, 3),
                    distance: 1.0
                },
                Merge {
                    clusters: (0, 2),
                    distance: 3.0
                },
            ]
        );
    }

    #[test]
    fn merge_count_is_n_minus_k() {
        let fit = Agglomerative::new(2, Linkage::Average)
            .fit(&chain())
            .unwrap();
        assert_eq!(fit.merges.len(), 2);
    }

    #[test]
    fn merge_distances_never_decrease() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.3, 0.0],
            vec![4.0, 4.0],
            vec![4.5, 4.0],
            vec![-3.0, 1.0],
            vec![9.0, -2.0],
        ];
        let fit = Agglomerative::new(1, Linkage::Average).fit(&data).unwrap();
        assert!(fit
            .merges
            .windows(2)
            .all(|w| w[0].distance <= w[1].distance + 1e-6));
    }

    #[test]
    fn labels_are_contiguous_from_zero() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![-4.0, 2.0],
            vec![-4.1, 2.1],
        ];
        let mut labels = Agglomerative::new(3, Linkage::Complete)
            .fit_predict(&data)
            .unwrap();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels, vec![0, 1, 2]);
    }

    #[test]
    fn rejects_empty_input() {
        let result = Agglomerative::new(2, Linkage::Average).fit_predict(&[]);
        assert!(matches!(result, Err(Error::EmptyInput)));
    }

    #[test]
    fn rejects_more_clusters_than_points() {
        let result = Agglomerative::new(5, Linkage::Average).fit_predict(&chain());
        assert!(matches!(result, Err(Error::InvalidClusterCount { .. })));
    }

    #[test]
    fn rejects_ragged_rows() {
        let data = vec![vec![0.0, 1.0], vec![1.0]];
        let result = Agglomerative::new(1, Linkage::Average).fit_predict(&data);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn pearson_request_behaves_like_euclidean() {
        let data = chain();
        let e = Agglomerative::new(2, Linkage::Average)
            .with_metric(DistanceMetric::Euclidean)
            .fit_predict(&data)
            .unwrap();
        let p = Agglomerative::new(2, Linkage::Average)
            .with_metric(DistanceMetric::Pearson)
            .fit_predict(&data)
            .unwrap();
        assert_eq!(e, p);
    }

    #[test]
    fn linkage_parses_from_str() {
        assert_eq!("single".parse::<Linkage>().unwrap(), Linkage::Single);
        assert_eq!("Complete".parse::<Linkage>().unwrap(), Linkage::Complete);
        assert!("ward".parse::<Linkage>().is_err());
    }
}
