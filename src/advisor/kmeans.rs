//! Deterministic k-means clustering
//!
//! Lloyd iterations seeded by farthest-first initialisation:
//! - the first centroid is the point with the lowest feature sum
//! - each further centroid is the point farthest from those already chosen
//!
//! Ties always resolve to the lowest index, so the same input gives the
//! same labels on every run, sequential or parallel. Assignment is a pure
//! function of a point and the centroids, so identical points always share
//! a cluster. Empty clusters keep their previous centroid.
//!
//! When the batch holds fewer distinct points than requested clusters, the
//! model fits `distinct` clusters instead.

use super::{FeatureVector, FEATURES};
use crate::error::{NetFleetError, Result};
use rayon::prelude::*;
use std::collections::HashSet;

/// K-means model parameters
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Requested number of clusters
    pub n_clusters: usize,
    /// Iteration cap
    pub max_iter: usize,
    /// Centroid shift below which iteration stops
    pub tol: f64,
    /// Run the assignment step on the rayon pool
    pub parallel: bool,
}

/// Result of fitting one batch
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster index per input row
    pub labels: Vec<usize>,
    /// Final centroids, one per effective cluster
    pub centroids: Vec<FeatureVector>,
    /// Sum of squared distances to assigned centroids
    pub inertia: f64,
    /// Lloyd iterations run
    pub iterations: usize,
}

impl KMeansFit {
    /// Number of clusters actually fitted
    pub fn effective_clusters(&self) -> usize {
        self.centroids.len()
    }
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(3)
    }
}

fn squared_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

fn nearest(point: &FeatureVector, centroids: &[FeatureVector]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(point, centroid);
        if d < best_dist {
            best_dist = d;
            best = c;
        }
    }
    best
}

/// Number of distinct rows, compared bit for bit (with -0.0 folded into 0.0)
pub fn distinct_rows(rows: &[FeatureVector]) -> usize {
    rows.iter()
        .map(|r| r.map(|v| (v + 0.0).to_bits()))
        .collect::<HashSet<_>>()
        .len()
}

impl KMeans {
    /// Create a model for `n_clusters` clusters
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: 300,
            tol: 1e-4,
            parallel: true,
        }
    }

    /// Set the iteration cap
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Enable or disable the parallel assignment step
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn farthest_first_init(rows: &[FeatureVector], k: usize) -> Vec<FeatureVector> {
        let mut centroids = Vec::with_capacity(k);

        let mut first = 0;
        let mut lowest = f64::INFINITY;
        for (i, row) in rows.iter().enumerate() {
            let total: f64 = row.iter().sum();
            if total < lowest {
                lowest = total;
                first = i;
            }
        }
        centroids.push(rows[first]);

        while centroids.len() < k {
            let mut chosen = 0;
            let mut farthest = -1.0;
            for (i, row) in rows.iter().enumerate() {
                let d = centroids
                    .iter()
                    .map(|c| squared_distance(row, c))
                    .fold(f64::INFINITY, f64::min);
                if d > farthest {
                    farthest = d;
                    chosen = i;
                }
            }
            centroids.push(rows[chosen]);
        }

        centroids
    }

    fn assign(&self, rows: &[FeatureVector], centroids: &[FeatureVector]) -> Vec<usize> {
        if self.parallel {
            rows.par_iter().map(|row| nearest(row, centroids)).collect()
        } else {
            rows.iter().map(|row| nearest(row, centroids)).collect()
        }
    }

    /// Fit the model to one batch
    pub fn fit(&self, rows: &[FeatureVector]) -> Result<KMeansFit> {
        if self.n_clusters == 0 {
            return Err(NetFleetError::config("cluster count must be at least 1"));
        }
        if rows.len() < self.n_clusters {
            return Err(NetFleetError::InsufficientSamples {
                samples: rows.len(),
                clusters: self.n_clusters,
            });
        }

        let distinct = distinct_rows(rows);
        let k = self.n_clusters.min(distinct);
        if k < self.n_clusters {
            tracing::warn!(
                "Only {} distinct feature vectors; fitting {} of {} clusters",
                distinct,
                k,
                self.n_clusters
            );
        }

        let mut centroids = Self::farthest_first_init(rows, k);
        let mut labels = self.assign(rows, &centroids);
        let mut iterations = 0;

        while iterations < self.max_iter {
            iterations += 1;

            let mut sums = vec![[0.0; FEATURES]; k];
            let mut counts = vec![0usize; k];
            for (row, &label) in rows.iter().zip(&labels) {
                counts[label] += 1;
                for j in 0..FEATURES {
                    sums[label][j] += row[j];
                }
            }

            let mut shift = 0.0_f64;
            for c in 0..k {
                if counts[c] == 0 {
                    continue;
                }
                let mut updated = sums[c];
                for value in updated.iter_mut() {
                    *value /= counts[c] as f64;
                }
                shift += squared_distance(&centroids[c], &updated);
                centroids[c] = updated;
            }

            let new_labels = self.assign(rows, &centroids);
            let changed = new_labels.iter().zip(&labels).filter(|(a, b)| a != b).count();
            labels = new_labels;

            tracing::debug!("k-means iteration {}: {} reassigned, shift {:.6}", iterations, changed, shift.sqrt());

            if changed == 0 || shift.sqrt() < self.tol {
                break;
            }
        }

        let inertia = rows
            .iter()
            .zip(&labels)
            .map(|(row, &label)| squared_distance(row, &centroids[label]))
            .sum();

        Ok(KMeansFit {
            labels,
            centroids,
            inertia,
            iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_separates_obvious_groups() {
        let rows = vec![
            [0.0, 0.0, 0.0],
            [0.1, 0.0, 0.1],
            [5.0, 5.0, 5.0],
            [5.1, 4.9, 5.0],
            [10.0, 10.0, 10.0],
        ];
        let fit = KMeans::new(3).fit(&rows).unwrap();
        assert_eq!(fit.labels[0], fit.labels[1]);
        assert_eq!(fit.labels[2], fit.labels[3]);
        assert_ne!(fit.labels[0], fit.labels[2]);
        assert_ne!(fit.labels[2], fit.labels[4]);
        assert_eq!(fit.effective_clusters(), 3);
    }

    #[test]
    fn test_insufficient_samples() {
        let rows = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        match KMeans::new(3).fit(&rows) {
            Err(NetFleetError::InsufficientSamples { samples, clusters }) => {
                assert_eq!(samples, 2);
                assert_eq!(clusters, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_zero_clusters_rejected() {
        assert!(matches!(KMeans::new(0).fit(&[[0.0; FEATURES]]), Err(NetFleetError::ConfigError(_))));
    }

    #[test]
    fn test_degrades_with_duplicate_points() {
        let rows = vec![[1.0, 1.0, 1.0]; 5];
        let fit = KMeans::new(3).fit(&rows).unwrap();
        assert_eq!(fit.effective_clusters(), 1);
        assert!(fit.labels.iter().all(|&l| l == 0));
        assert_eq!(fit.inertia, 0.0);
    }

    #[test]
    fn test_distinct_rows() {
        assert_eq!(distinct_rows(&[[1.0, 2.0, 3.0], [1.0, 2.0, 3.0], [3.0, 2.0, 1.0]]), 2);
        assert_eq!(distinct_rows(&[]), 0);
    }

    proptest! {
        #[test]
        fn prop_parallel_matches_sequential(
            rows in proptest::collection::vec(prop::array::uniform3(-3.0f64..3.0), 3..60)
        ) {
            let parallel = KMeans::new(3).with_parallel(true).fit(&rows).unwrap();
            let sequential = KMeans::new(3).with_parallel(false).fit(&rows).unwrap();
            prop_assert_eq!(parallel, sequential);
        }

        #[test]
        fn prop_identical_points_share_cluster(
            rows in proptest::collection::vec(prop::array::uniform3(0u8..4), 3..40)
        ) {
            let rows: Vec<FeatureVector> = rows
                .iter()
                .map(|r| [r[0] as f64, r[1] as f64, r[2] as f64])
                .collect();
            let fit = KMeans::new(3).fit(&rows).unwrap();
            for i in 0..rows.len() {
                for j in 0..rows.len() {
                    if rows[i] == rows[j] {
                        prop_assert_eq!(fit.labels[i], fit.labels[j]);
                    }
                }
            }
        }
    }
}
