//! Principal component analysis for the projection scatter.

use crate::error::{Error, Result};
use crate::linalg;

/// Observations projected onto their leading principal components.
#[derive(Debug, Clone)]
pub struct Projection {
    /// One row per observation, one column per retained component.
    pub coordinates: Vec<Vec<f32>>,
    /// Fraction of total variance captured by each component, in
    /// descending component order.
    pub explained_variance_ratio: Vec<f32>,
}

impl Projection {
    /// Project `data` onto its top principal components.
    ///
    /// The number of components is capped at `min(n_components, rows,
    /// cols)`. Covariance is accumulated in `f64` and the leading
    /// eigenpairs come from the shared power-iteration solver, so a fixed
    /// seed reproduces the same projection (up to the usual sign ambiguity
    /// of eigenvectors).
    pub fn fit(data: &[Vec<f32>], n_components: usize, seed: u64) -> Result<Projection> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        if n_components == 0 {
            return Err(Error::InvalidParameter {
                name: "n_components",
                message: "must be at least 1",
            });
        }
        let n = data.len();
        let m = data[0].len();
        for row in data {
            if row.len() != m {
                return Err(Error::DimensionMismatch {
                    expected: m,
                    found: row.len(),
                });
            }
        }
        let k = n_components.min(n).min(m);

        let mut means = vec![0.0f64; m];
        for row in data {
            for (mean, &x) in means.iter_mut().zip(row.iter()) {
                *mean += f64::from(x);
            }
        }
        for mean in means.iter_mut() {
            *mean /= n as f64;
        }
        let centered: Vec<Vec<f64>> = data
            .iter()
            .map(|row| {
                row.iter()
                    .zip(means.iter())
                    .map(|(&x, &mean)| f64::from(x) - mean)
                    .collect()
            })
            .collect();

        // sample covariance; a single observation leaves it all zero
        let mut covariance = vec![0.0f64; m * m];
        if n > 1 {
            for row in &centered {
                for i in 0..m {
                    for j in i..m {
                        covariance[i * m + j] += row[i] * row[j];
                    }
                }
            }
            let denom = (n - 1) as f64;
            for i in 0..m {
                for j in i..m {
                    let v = covariance[i * m + j] / denom;
                    covariance[i * m + j] = v;
                    covariance[j * m + i] = v;
                }
            }
        }
        let total_variance: f64 = (0..m).map(|i| covariance[i * m + i]).sum();

        let pairs = linalg::top_eigenpairs(&covariance, m, k, seed);

        let coordinates = centered
            .iter()
            .map(|row| {
                pairs
                    .iter()
                    .map(|(_, vector)| linalg::dot(row, vector) as f32)
                    .collect()
            })
            .collect();
        let explained_variance_ratio = pairs
            .iter()
            .map(|(value, _)| {
                if total_variance > 1e-12 {
                    (value.max(0.0) / total_variance) as f32
                } else {
                    0.0
                }
            })
            .collect();

        Ok(Projection {
            coordinates,
            explained_variance_ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_the_dominant_direction() {
        // points on the line y = x: all variance lives in one component
        let data = vec![vec![-1.0, -1.0], vec![0.0, 0.0], vec![1.0, 1.0]];
        let projection = Projection::fit(&data, 2, 42).unwrap();
        assert_eq!(projection.coordinates.len(), 3);
        assert_eq!(projection.explained_variance_ratio.len(), 2);
        assert!((projection.explained_variance_ratio[0] - 1.0).abs() < 1e-5);
        assert!(projection.explained_variance_ratio[1].abs() < 1e-5);

        let spread = std::f32::consts::SQRT_2;
        assert!((projection.coordinates[0][0].abs() - spread).abs() < 1e-4);
        assert!(projection.coordinates[1][0].abs() < 1e-4);
        assert!((projection.coordinates[2][0].abs() - spread).abs() < 1e-4);
    }

    #[test]
    fn component_count_is_capped_by_shape() {
        let data = vec![vec![1.0, 2.0], vec![3.0, 1.0], vec![0.0, 0.0]];
        let projection = Projection::fit(&data, 4, 1).unwrap();
        // min(4 requested, 3 rows, 2 cols)
        assert_eq!(projection.coordinates[0].len(), 2);
        assert_eq!(projection.explained_variance_ratio.len(), 2);
    }

    #[test]
    fn ratios_are_descending_and_bounded() {
        let data = vec![
            vec![1.0, 0.2, -0.5],
            vec![2.0, -0.3, 0.1],
            vec![-1.5, 0.8, 0.4],
            vec![0.5, -0.6, -0.2],
        ];
        let projection = Projection::fit(&data, 3, 9).unwrap();
        let r = &projection.explained_variance_ratio;
        let sum: f32 = r.iter().sum();
        assert!(sum <= 1.0 + 1e-4);
        assert!(r.windows(2).all(|w| w[0] >= w[1] - 1e-5));
        assert!(r.iter().all(|&x| (0.0..=1.0 + 1e-5).contains(&x)));
    }

    #[test]
    fn constant_data_projects_to_zero() {
        let data = vec![vec![2.0, 3.0]; 4];
        let projection = Projection::fit(&data, 2, 5).unwrap();
        for row in &projection.coordinates {
            assert!(row.iter().all(|&x| x.abs() < 1e-6));
        }
        assert!(projection
            .explained_variance_ratio
            .iter()
            .all(|&r| r == 0.0));
    }

    #[test]
    fn single_observation_projects_to_zero() {
        let data = vec![vec![1.0, 2.0, 3.0]];
        let projection = Projection::fit(&data, 4, 3).unwrap();
        assert_eq!(projection.coordinates.len(), 1);
        assert_eq!(projection.coordinates[0].len(), 1);
        assert!(projection.coordinates[0][0].abs() < 1e-6);
    }

    #[test]
    fn seeded_projections_are_reproducible() {
        let data = vec![
            vec![1.0, 0.0, 2.0],
            vec![0.0, 1.0, -1.0],
            vec![2.0, 2.0, 0.5],
            vec![-1.0, 0.5, 1.5],
        ];
        let a = Projection::fit(&data, 3, 17).unwrap();
        let b = Projection::fit(&data, 3, 17).unwrap();
        assert_eq!(a.coordinates, b.coordinates);
        assert_eq!(a.explained_variance_ratio, b.explained_variance_ratio);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            Projection::fit(&[], 2, 0),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn rejects_zero_components() {
        let data = vec![vec![1.0]];
        assert!(matches!(
            Projection::fit(&data, 0, 0),
            Err(Error::InvalidParameter {
                name: "n_components",
                ..
            })
        ));
    }

    #[test]
    fn rejects_ragged_rows() {
        let data = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(
            Projection::fit(&data, 1, 0),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
