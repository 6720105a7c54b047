//! Agreement counting across the four clustering algorithms.
//!
//! Running k-means, agglomerative, k-medoids, and spectral clustering over
//! the same observations yields four label vectors (a [`LabelSet`]). The
//! [`ConsensusMatrix`] counts, for every pair of observations, how many of
//! the four algorithms put the pair in the same cluster, giving a value
//! between 0 (never together) and [`NUM_ALGORITHMS`] (always together).
//!
//! Two display transforms operate on the matrix:
//!
//! - [`DegreeFilter`] restricts it to the pairs of one exact agreement
//!   degree, the dashboard's way of asking "what do exactly three
//!   algorithms agree on?".
//! - [`reorder`] permutes it so agreeing observations form contiguous
//!   blocks, which is what a heatmap needs to show structure.
//!
//! ```rust
//! use concord::consensus::{ConsensusMatrix, DegreeFilter, LabelSet};
//!
//! let labels = LabelSet {
//!     kmeans: vec![0, 0, 1],
//!     hierarchical: vec![0, 0, 1],
//!     kmedoids: vec![0, 1, 1],
//!     spectral: vec![0, 0, 0],
//! };
//! let consensus = ConsensusMatrix::from_labels(&labels, None).unwrap();
//! assert_eq!(consensus.get(0, 1), 3);
//!
//! let strong = DegreeFilter::Exactly(3).apply(&consensus).unwrap();
//! assert_eq!(strong.ids(), &["1", "2"]);
//! ```

mod filter;
mod matrix;
mod reorder;

pub use filter::DegreeFilter;
pub use matrix::{ConsensusMatrix, LabelSet, ALGORITHM_NAMES, NUM_ALGORITHMS};
pub use reorder::reorder;
