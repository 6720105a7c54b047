//! Consensus clustering over one feature matrix.
//!
//! `concord` runs four complementary clustering algorithms (k-means,
//! agglomerative, k-medoids, and spectral) against the same standardized
//! observation table, counts per observation pair how many of them agree,
//! and prepares that agreement matrix for heatmap display (exact-degree
//! filtering plus spectral reordering). A PCA projection and a CSV label
//! export round out what a dashboard needs to draw.
//!
//! The algorithms live under [`cluster`], the agreement machinery under
//! [`consensus`], and [`pipeline::run`] ties the whole analysis together
//! as one pure, seedable function:
//!
//! ```no_run
//! use concord::{pipeline, Dataset, PipelineConfig};
//!
//! let dataset = Dataset::from_csv_path("observations.csv")?;
//! let config = PipelineConfig {
//!     k: 3,
//!     seed: Some(42),
//!     ..PipelineConfig::default()
//! };
//! let analysis = pipeline::run(&dataset, &config)?;
//! println!("strong pairs: {}", analysis.heatmap.len());
//! # Ok::<(), concord::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod consensus;
pub mod dataset;
pub mod error;
pub mod export;
mod linalg;
pub mod pca;
pub mod pipeline;

pub use cluster::{
    Agglomerative, AgglomerativeFit, Clustering, DistanceMetric, Kmeans, KmeansFit, Kmedoids,
    Linkage, Merge, Spectral,
};
pub use consensus::{ConsensusMatrix, DegreeFilter, LabelSet, ALGORITHM_NAMES, NUM_ALGORITHMS};
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use pca::Projection;
pub use pipeline::{ConsensusAnalysis, PipelineConfig};
