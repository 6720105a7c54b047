//! Clustering algorithms for grouping observations.
//!
//! This module provides the four hard-clustering algorithms whose agreement
//! the [`consensus`](crate::consensus) module counts. All of them share the
//! [`Clustering`] trait and operate on dense rows of `f32` features.
//!
//! ## Algorithms
//!
//! ### K-means
//!
//! The classic algorithm: assign each point to the nearest centroid, then
//! update centroids to the mean of their points. Repeat.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! Seeding is k-means++ and several seeded restarts keep the best fit, so
//! results are reproducible for a fixed seed.
//!
//! ### Agglomerative
//!
//! Bottom-up hierarchical clustering: every point starts alone and the
//! closest pair of clusters merges until `k` remain. [`Linkage`] picks how
//! cluster-to-cluster distance is defined. Fully deterministic.
//!
//! ### K-medoids
//!
//! Like k-means but centers are actual data points, which makes it robust
//! to outliers and meaningful for any dissimilarity. Seeded by the
//! deterministic PAM BUILD procedure.
//!
//! ### Spectral
//!
//! Clusters by the leading eigenvectors of a normalized affinity matrix,
//! which finds groups that are connected rather than compact. Also the
//! backbone of the consensus-matrix reordering used for heatmap display.
//!
//! ## Distance metrics
//!
//! [`DistanceMetric`] selects the dissimilarity. One long-standing caveat
//! is preserved on purpose: a `Pearson` request is evaluated as Euclidean
//! distance by k-means and agglomerative clustering, and as a
//! presence/absence distance by k-medoids. See the per-algorithm docs.
//!
//! ## Usage
//!
//! ```rust
//! use concord::cluster::{Agglomerative, Clustering, Kmeans, Kmedoids, Linkage, Spectral};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);  // First two together
//! assert_ne!(labels[0], labels[2]);  // Separate from last two
//!
//! let labels = Agglomerative::new(2, Linkage::Average).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//!
//! let labels = Kmedoids::new(2).fit_predict(&data).unwrap();
//! assert_eq!(labels[2], labels[3]);
//!
//! let labels = Spectral::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels.len(), data.len());
//! ```

mod agglomerative;
pub mod distance;
mod kmeans;
mod kmedoids;
mod spectral;
mod traits;

pub use agglomerative::{Agglomerative, AgglomerativeFit, Linkage, Merge};
pub use distance::DistanceMetric;
pub use kmeans::{Kmeans, KmeansFit};
pub use kmedoids::Kmedoids;
pub use spectral::Spectral;
pub use traits::Clustering;
