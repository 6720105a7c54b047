//! The full consensus analysis as one pure function.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cluster::{
    Agglomerative, Clustering, DistanceMetric, Kmeans, Kmedoids, Linkage, Spectral,
};
use crate::consensus::{reorder, ConsensusMatrix, DegreeFilter, LabelSet};
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::pca::Projection;

/// Smallest cluster count the dashboard slider offers.
pub const MIN_CLUSTERS: usize = 2;
/// Largest cluster count the dashboard slider offers.
pub const MAX_CLUSTERS: usize = 25;

/// Components retained for the projection scatter.
const N_COMPONENTS: usize = 4;

/// Everything one analysis run depends on.
///
/// Serializable so a run can be captured alongside its inputs and replayed
/// exactly (the seed covers every randomized stage).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Shared cluster count for all four algorithms.
    pub k: usize,
    /// Distance metric selection.
    pub metric: DistanceMetric,
    /// Linkage used by the hierarchical algorithm.
    pub linkage: Linkage,
    /// Degree restriction applied to the heatmap view.
    pub degree: DegreeFilter,
    /// Seed for the randomized stages; `None` draws a fresh one per run.
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            k: 4,
            metric: DistanceMetric::default(),
            linkage: Linkage::default(),
            degree: DegreeFilter::default(),
            seed: None,
        }
    }
}

impl PipelineConfig {
    /// Check parameter ranges before running.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CLUSTERS..=MAX_CLUSTERS).contains(&self.k) {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be between 2 and 25",
            });
        }
        if let DegreeFilter::Exactly(d) = self.degree {
            if d == 0 || d > 4 {
                return Err(Error::InvalidParameter {
                    name: "degree",
                    message: "exact degree must be between 1 and 4",
                });
            }
        }
        Ok(())
    }
}

/// Immutable result of one analysis run.
///
/// Every output is addressed by name; nothing downstream needs to know
/// column positions or stitch vectors back together.
#[derive(Debug, Clone)]
pub struct ConsensusAnalysis {
    /// One label vector per algorithm, values in `1..=k`.
    pub labels: LabelSet,
    /// The full agreement matrix, rows in input order.
    pub consensus: ConsensusMatrix,
    /// Degree-filtered and spectrally reordered matrix, ready for heatmap
    /// rendering. May be empty when no pair has the requested degree.
    pub heatmap: ConsensusMatrix,
    /// Top principal components of the standardized features.
    pub projection: Projection,
}

/// Run the four algorithms, count their agreement, and prepare the display
/// views.
///
/// This is a pure function: it reads the dataset and config, returns a
/// fresh [`ConsensusAnalysis`], and keeps no state between calls. With a
/// fixed seed the whole run is reproducible. A dataset smaller than `k`
/// fails outright; there is no partial output.
pub fn run(dataset: &Dataset, config: &PipelineConfig) -> Result<ConsensusAnalysis> {
    config.validate()?;
    let n = dataset.len();
    if n < config.k {
        return Err(Error::InvalidClusterCount {
            requested: config.k,
            n_items: n,
        });
    }

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    info!(
        "consensus run: {n} observations x {} features, k={}, metric={}, linkage={}, degree={}",
        dataset.n_features(),
        config.k,
        config.metric,
        config.linkage,
        config.degree
    );

    let features = dataset.standardized();

    // one independent seed stream per randomized stage
    let labels = LabelSet {
        kmeans: shifted(
            Kmeans::new(config.k)
                .with_metric(config.metric)
                .with_seed(seed)
                .fit_predict(&features)?,
        ),
        hierarchical: shifted(
            Agglomerative::new(config.k, config.linkage)
                .with_metric(config.metric)
                .fit_predict(&features)?,
        ),
        kmedoids: shifted(
            Kmedoids::new(config.k)
                .with_metric(config.metric)
                .fit_predict(&features)?,
        ),
        spectral: shifted(
            Spectral::new(config.k)
                .with_seed(seed.wrapping_add(10))
                .fit_predict(&features)?,
        ),
    };

    let consensus = ConsensusMatrix::from_labels(&labels, Some(dataset.ids()))?;
    let filtered = config.degree.apply(&consensus)?;
    debug!(
        "degree filter {} kept {} of {n} observations",
        config.degree,
        filtered.len()
    );
    let (heatmap, _) = reorder(&filtered, config.k, seed.wrapping_add(20))?;
    let projection = Projection::fit(&features, N_COMPONENTS, seed.wrapping_add(30))?;

    Ok(ConsensusAnalysis {
        labels,
        consensus,
        heatmap,
        projection,
    })
}

/// Algorithms label from 0; the analysis reports clusters `1..=k`.
fn shifted(labels: Vec<usize>) -> Vec<usize> {
    labels.into_iter().map(|l| l + 1).collect()
}
