//! Spectral reordering of the consensus matrix for display.

use crate::cluster::Spectral;
use crate::consensus::matrix::ConsensusMatrix;
use crate::error::Result;

/// Reorder the matrix so observations that tend to agree sit in contiguous
/// blocks, the order a heatmap wants.
///
/// The matrix is treated as an affinity and spectrally clustered into
/// `min(k, len)` groups; row indices are then stable-sorted by group
/// label, so the original input order survives within each block. Returns
/// the permuted matrix and the permutation itself (`order[new] = old`).
///
/// An empty matrix, a legitimate outcome of degree filtering, reorders to
/// itself with an empty permutation.
pub fn reorder(
    matrix: &ConsensusMatrix,
    k: usize,
    seed: u64,
) -> Result<(ConsensusMatrix, Vec<usize>)> {
    let n = matrix.len();
    if n == 0 {
        return Ok((matrix.clone(), Vec::new()));
    }

    let labels = Spectral::new(k.min(n))
        .with_seed(seed)
        .fit_predict_affinity(&matrix.to_affinity())?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| labels[i]);
    let permuted = matrix.permuted(&order)?;
    Ok((permuted, order))
}
