//! Consensus clustering on a simple 2D dataset.

use concord::{ConsensusAnalysis, Dataset, PipelineConfig, ALGORITHM_NAMES};

fn main() {
    // Two well-separated clusters in 2D.
    let ids: Vec<String> = (1..=8).map(|i| format!("sample-{i}")).collect();
    let features = vec![
        // Cluster A (near origin)
        vec![0.0, 0.0],
        vec![0.1, 0.2],
        vec![0.2, 0.1],
        vec![-0.1, 0.1],
        // Cluster B (near (5, 5))
        vec![5.0, 5.0],
        vec![5.1, 4.9],
        vec![4.9, 5.1],
        vec![5.2, 5.2],
    ];
    let columns = vec!["x".to_string(), "y".to_string()];
    let dataset = Dataset::new(ids, features, columns).unwrap();

    let config = PipelineConfig {
        k: 2,
        seed: Some(42),
        ..PipelineConfig::default()
    };
    let analysis: ConsensusAnalysis = concord::pipeline::run(&dataset, &config).unwrap();

    println!("=== Cluster labels (k=2) ===");
    for (i, id) in dataset.ids().iter().enumerate() {
        println!(
            "  {:9} => kmeans {}  hierarchical {}  kmedoids {}  spectral {}",
            id,
            analysis.labels.kmeans[i],
            analysis.labels.hierarchical[i],
            analysis.labels.kmedoids[i],
            analysis.labels.spectral[i],
        );
    }

    println!("\n=== Consensus (pairs scored 0..={}) ===", ALGORITHM_NAMES.len());
    let consensus = &analysis.consensus;
    for i in 0..consensus.len() {
        for j in (i + 1)..consensus.len() {
            println!(
                "  {} / {} agree in {} of {} algorithms",
                consensus.ids()[i],
                consensus.ids()[j],
                consensus.get(i, j),
                ALGORITHM_NAMES.len(),
            );
        }
    }

    println!("\n=== Heatmap order after spectral reordering ===");
    println!("  {:?}", analysis.heatmap.ids());

    println!("\n=== Variance explained by the first components ===");
    for (i, ratio) in analysis.projection.explained_variance_ratio.iter().enumerate() {
        println!("  component {} => {:5.1}%", i + 1, ratio * 100.0);
    }
}
