//! Command-line driver: load a CSV, run the consensus analysis, summarize.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use concord::consensus::{ConsensusMatrix, ALGORITHM_NAMES, NUM_ALGORITHMS};
use concord::{export, pipeline, Dataset, DegreeFilter, DistanceMetric, Linkage, PipelineConfig};

#[derive(Parser, Debug)]
#[command(
    name = "concord",
    version,
    about = "Consensus clustering over a CSV of observations"
)]
struct Args {
    /// CSV file: identifier column followed by numeric attribute columns.
    input: PathBuf,

    /// Number of clusters shared by all four algorithms (2-25).
    #[arg(long, default_value_t = 4)]
    k: usize,

    /// Distance metric: euclidean, pearson, or manhattan.
    #[arg(long, default_value = "euclidean")]
    distance: DistanceMetric,

    /// Linkage for the hierarchical algorithm: single, complete, or average.
    #[arg(long, default_value = "average")]
    linkage: Linkage,

    /// Heatmap degree: 1-4 keep pairs with that exact agreement count,
    /// 5 or "all" keeps everything.
    #[arg(long, default_value = "all")]
    degree: DegreeFilter,

    /// Write the per-algorithm labels to this CSV file.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Seed for reproducible runs; omitted means a fresh seed.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> concord::Result<()> {
    let dataset = Dataset::from_csv_path(&args.input)?;
    let config = PipelineConfig {
        k: args.k,
        metric: args.distance,
        linkage: args.linkage,
        degree: args.degree,
        seed: args.seed,
    };
    let analysis = pipeline::run(&dataset, &config)?;

    println!(
        "{} observations x {} features, k={}",
        dataset.len(),
        dataset.n_features(),
        args.k
    );
    for (name, labels) in ALGORITHM_NAMES.iter().zip(analysis.labels.algorithms()) {
        println!("{name:>13}: cluster sizes {:?}", cluster_sizes(labels, args.k));
    }

    let counts = agreement_distribution(&analysis.consensus);
    let summary: Vec<String> = counts
        .iter()
        .enumerate()
        .map(|(degree, count)| format!("{degree}:{count}"))
        .collect();
    println!("pair agreement: {}", summary.join("  "));

    let variance: Vec<String> = analysis
        .projection
        .explained_variance_ratio
        .iter()
        .map(|r| format!("{:.1}%", r * 100.0))
        .collect();
    println!("explained variance: {}", variance.join(" "));
    println!(
        "heatmap: {} observations after degree filter {}",
        analysis.heatmap.len(),
        args.degree
    );

    if let Some(path) = &args.out {
        export::write_labels_csv_path(path, dataset.ids(), &analysis.labels)?;
        println!("labels written to {}", path.display());
    }
    Ok(())
}

/// Cluster sizes for labels numbered `1..=k`.
fn cluster_sizes(labels: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0usize; k];
    for &label in labels {
        if (1..=k).contains(&label) {
            sizes[label - 1] += 1;
        }
    }
    sizes
}

/// How many unordered pairs sit at each agreement degree.
fn agreement_distribution(matrix: &ConsensusMatrix) -> [usize; NUM_ALGORITHMS + 1] {
    let mut counts = [0usize; NUM_ALGORITHMS + 1];
    for i in 0..matrix.len() {
        for j in (i + 1)..matrix.len() {
            counts[usize::from(matrix.get(i, j))] += 1;
        }
    }
    counts
}
