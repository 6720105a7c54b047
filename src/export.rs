//! CSV export of the per-algorithm label vectors.

use std::io::Write;
use std::path::Path;

use log::debug;

use crate::consensus::{LabelSet, ALGORITHM_NAMES};
use crate::error::{Error, Result};

/// Write the four label vectors as CSV, one row per observation.
///
/// The header is `id,kmeans,hierarchical,kmedoids,spectral` and the id
/// column carries the observation identifiers so the file joins cleanly
/// back onto the source data.
pub fn write_labels_csv<W: Write>(writer: W, ids: &[String], labels: &LabelSet) -> Result<()> {
    for algorithm in labels.algorithms() {
        if algorithm.len() != ids.len() {
            return Err(Error::InconsistentLabels {
                expected: ids.len(),
                found: algorithm.len(),
            });
        }
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(std::iter::once("id").chain(ALGORITHM_NAMES))?;
    for (i, id) in ids.iter().enumerate() {
        let kmeans = labels.kmeans[i].to_string();
        let hierarchical = labels.hierarchical[i].to_string();
        let kmedoids = labels.kmedoids[i].to_string();
        let spectral = labels.spectral[i].to_string();
        csv_writer.write_record([
            id.as_str(),
            kmeans.as_str(),
            hierarchical.as_str(),
            kmedoids.as_str(),
            spectral.as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the label CSV to a file on disk.
pub fn write_labels_csv_path<P: AsRef<Path>>(
    path: P,
    ids: &[String],
    labels: &LabelSet,
) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_labels_csv(std::io::BufWriter::new(file), ids, labels)?;
    debug!(
        "wrote labels for {} observations to {}",
        ids.len(),
        path.as_ref().display()
    );
    Ok(())
}
