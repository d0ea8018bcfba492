//! Scaling recommendations from clustered telemetry

use super::kmeans::KMeans;
use super::scaler::StandardScaler;
use super::FeatureVector;
use crate::config::AdvisorConfig;
use crate::error::Result;
use crate::telemetry::TelemetrySample;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cluster membership of one device, relabeled by usage tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    /// Device name
    pub device_name: String,
    /// Usage tier: 0 is the lowest mean usage
    pub cluster_id: usize,
}

/// Suggested scaling direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingAction {
    /// Device sits in the lowest usage tier
    ScaleDown,
    /// Device sits in the highest usage tier
    ScaleUp,
}

/// Advisory for one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Device name
    pub device_name: String,
    /// Suggested action
    pub action: ScalingAction,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            ScalingAction::ScaleDown => {
                write!(f, "Consider scaling down resources for {}", self.device_name)
            }
            ScalingAction::ScaleUp => {
                write!(f, "Consider scaling up resources for {}", self.device_name)
            }
        }
    }
}

/// Outcome of one advisory run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryReport {
    /// One assignment per sample, in sample order
    pub assignments: Vec<ClusterAssignment>,
    /// Advisories for the lowest and highest tiers, in sample order
    pub recommendations: Vec<Recommendation>,
    /// Cluster count requested
    pub requested_clusters: usize,
    /// Non-empty clusters actually formed
    pub effective_clusters: usize,
    /// k-means iterations
    pub iterations: usize,
    /// Within-cluster sum of squares in standardized space
    pub inertia: f64,
}

impl AdvisoryReport {
    /// Recommendation strings
    pub fn messages(&self) -> Vec<String> {
        self.recommendations.iter().map(ToString::to_string).collect()
    }

    /// Tier of the first device with the given name
    pub fn tier_of(&self, device_name: &str) -> Option<usize> {
        self.assignments
            .iter()
            .find(|a| a.device_name == device_name)
            .map(|a| a.cluster_id)
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        println!("\n=== Optimization Advisory ===");
        println!("Devices:     {}", self.assignments.len());
        println!("Tiers:       {} (requested {})", self.effective_clusters, self.requested_clusters);
        println!("Iterations:  {}", self.iterations);

        println!("\nAssignments:");
        for assignment in &self.assignments {
            println!("  {:<20} tier {}", assignment.device_name, assignment.cluster_id);
        }

        if self.recommendations.is_empty() {
            println!("\nNo scaling changes suggested.");
        } else {
            println!("\nSuggested optimizations:");
            for recommendation in &self.recommendations {
                println!("  {}", recommendation);
            }
        }
    }
}

/// Clusters telemetry into usage tiers and emits scaling advice
///
/// The advisor holds only parameters; every call standardizes and
/// clusters the given batch from scratch.
#[derive(Debug, Clone, Default)]
pub struct OptimizationAdvisor {
    config: AdvisorConfig,
}

fn mean_usage(centroid: &FeatureVector) -> f64 {
    centroid.iter().sum::<f64>() / centroid.len() as f64
}

/// Map each cluster index to its usage tier
///
/// Only clusters with at least one member are ranked: by mean centroid
/// usage, then centroid traffic, then cluster index, all ascending.
/// Returns the tier per cluster index and the number of tiers.
pub fn rank_clusters(centroids: &[FeatureVector], labels: &[usize]) -> (Vec<usize>, usize) {
    let mut occupied: Vec<usize> = (0..centroids.len()).filter(|c| labels.contains(c)).collect();
    occupied.sort_by(|&a, &b| {
        let (ca, cb) = (&centroids[a], &centroids[b]);
        mean_usage(ca)
            .total_cmp(&mean_usage(cb))
            .then_with(|| ca[0].total_cmp(&cb[0]))
            .then(a.cmp(&b))
    });

    let mut tier_of_cluster = vec![0usize; centroids.len()];
    for (tier, &cluster) in occupied.iter().enumerate() {
        tier_of_cluster[cluster] = tier;
    }
    (tier_of_cluster, occupied.len())
}

impl OptimizationAdvisor {
    /// Create an advisor
    pub fn new(config: AdvisorConfig) -> Self {
        Self { config }
    }

    /// Advisor parameters
    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Cluster one telemetry batch and derive recommendations
    ///
    /// Fails with `InsufficientSamples` when the batch is smaller than the
    /// configured cluster count. With fewer distinct readings than clusters
    /// the run degrades to fewer tiers; a single tier produces no advice.
    pub fn advise(&self, samples: &[TelemetrySample]) -> Result<AdvisoryReport> {
        for sample in samples {
            sample.validate()?;
        }
        let raw: Vec<FeatureVector> = samples.iter().map(TelemetrySample::features).collect();
        let (_, scaled) = StandardScaler::fit_transform(&raw);

        let fit = KMeans::new(self.config.clusters)
            .with_max_iter(self.config.max_iter)
            .with_tolerance(self.config.tolerance)
            .with_parallel(self.config.parallel)
            .fit(&scaled)?;

        let (tier_of_cluster, tiers) = rank_clusters(&fit.centroids, &fit.labels);
        let top = tiers.saturating_sub(1);

        let mut assignments = Vec::with_capacity(samples.len());
        let mut recommendations = Vec::new();
        for (sample, &label) in samples.iter().zip(&fit.labels) {
            let tier = tier_of_cluster[label];
            assignments.push(ClusterAssignment {
                device_name: sample.device_name.clone(),
                cluster_id: tier,
            });

            let action = match tier {
                _ if tiers < 2 => None,
                0 => Some(ScalingAction::ScaleDown),
                t if t == top => Some(ScalingAction::ScaleUp),
                _ => None,
            };
            if let Some(action) = action {
                recommendations.push(Recommendation {
                    device_name: sample.device_name.clone(),
                    action,
                });
            }
        }

        tracing::info!(
            "Clustered {} device(s) into {} tier(s), {} recommendation(s)",
            samples.len(),
            tiers,
            recommendations.len()
        );

        Ok(AdvisoryReport {
            assignments,
            recommendations,
            requested_clusters: self.config.clusters,
            effective_clusters: tiers,
            iterations: fit.iterations,
            inertia: fit.inertia,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetFleetError;

    fn batch(rows: &[(&str, u32, u32, u32)]) -> Vec<TelemetrySample> {
        rows.iter()
            .map(|&(name, t, c, m)| TelemetrySample::new(name, t, c, m))
            .collect()
    }

    #[test]
    fn test_low_mid_high_batch() {
        let samples = batch(&[
            ("low-a", 10, 5, 5),
            ("low-b", 12, 6, 4),
            ("high-a", 900, 95, 90),
            ("high-b", 880, 92, 88),
            ("mid", 500, 50, 50),
        ]);
        let report = OptimizationAdvisor::default().advise(&samples).unwrap();

        assert_eq!(report.effective_clusters, 3);
        assert_eq!(report.tier_of("low-a"), Some(0));
        assert_eq!(report.tier_of("low-b"), Some(0));
        assert_eq!(report.tier_of("mid"), Some(1));
        assert_eq!(report.tier_of("high-a"), Some(2));
        assert_eq!(report.tier_of("high-b"), Some(2));

        assert_eq!(
            report.messages(),
            vec![
                "Consider scaling down resources for low-a",
                "Consider scaling down resources for low-b",
                "Consider scaling up resources for high-a",
                "Consider scaling up resources for high-b",
            ]
        );
    }

    #[test]
    fn test_equal_usage_ranked_by_traffic() {
        // Same mean usage; cluster 1 carries less traffic
        let centroids = [[1.5, -1.5, 0.0], [-1.5, 1.5, 0.0], [3.0, 3.0, 3.0]];
        let (tiers, count) = rank_clusters(&centroids, &[0, 1, 2, 1]);
        assert_eq!(count, 3);
        assert_eq!(tiers, vec![1, 0, 2]);

        let (tiers, count) = rank_clusters(&centroids[..2], &[0, 1]);
        assert_eq!(count, 2);
        assert_eq!(tiers, vec![1, 0]);
    }

    #[test]
    fn test_empty_clusters_are_not_ranked() {
        let centroids = [[2.0, 2.0, 2.0], [-1.0, -1.0, -1.0], [0.0, 0.0, 0.0]];
        let (tiers, count) = rank_clusters(&centroids, &[0, 1, 1, 0]);
        assert_eq!(count, 2);
        assert_eq!(tiers[0], 1);
        assert_eq!(tiers[1], 0);
    }

    #[test]
    fn test_identical_telemetry_is_uniform() {
        let samples = batch(&[
            ("a", 300, 30, 30),
            ("b", 300, 30, 30),
            ("c", 300, 30, 30),
            ("d", 300, 30, 30),
        ]);
        let report = OptimizationAdvisor::default().advise(&samples).unwrap();
        assert_eq!(report.effective_clusters, 1);
        assert!(report.assignments.iter().all(|a| a.cluster_id == 0));
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_fewer_devices_than_clusters() {
        let samples = batch(&[("R1", 10, 5, 5), ("S1", 900, 90, 90)]);
        match OptimizationAdvisor::default().advise(&samples) {
            Err(NetFleetError::InsufficientSamples { samples, clusters }) => {
                assert_eq!(samples, 2);
                assert_eq!(clusters, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(OptimizationAdvisor::default().advise(&[]).is_err());
    }

    #[test]
    fn test_two_distinct_readings_degrade_to_two_tiers() {
        let samples = batch(&[
            ("a", 10, 5, 5),
            ("b", 10, 5, 5),
            ("c", 950, 95, 95),
            ("d", 950, 95, 95),
        ]);
        let report = OptimizationAdvisor::default().advise(&samples).unwrap();
        assert_eq!(report.effective_clusters, 2);
        assert_eq!(report.requested_clusters, 3);
        let actions: Vec<_> = report.recommendations.iter().map(|r| r.action).collect();
        assert_eq!(
            actions,
            vec![
                ScalingAction::ScaleDown,
                ScalingAction::ScaleDown,
                ScalingAction::ScaleUp,
                ScalingAction::ScaleUp
            ]
        );
    }

    #[test]
    fn test_assignments_aligned_with_samples() {
        let samples = batch(&[
            ("x", 100, 10, 10),
            ("x", 700, 70, 70),
            ("y", 400, 40, 40),
            ("z", 999, 99, 99),
        ]);
        let report = OptimizationAdvisor::default().advise(&samples).unwrap();
        let names: Vec<_> = report.assignments.iter().map(|a| a.device_name.as_str()).collect();
        assert_eq!(names, vec!["x", "x", "y", "z"]);
        assert!(report.assignments.iter().all(|a| a.cluster_id < 3));
    }

    #[test]
    fn test_parallel_and_sequential_reports_match() {
        let samples: Vec<_> = (0..50u32)
            .map(|i| TelemetrySample::new(format!("d{i}"), (i * 37) % 1000, (i * 13) % 100, (i * 7) % 100))
            .collect();

        let parallel = OptimizationAdvisor::new(AdvisorConfig { parallel: true, ..Default::default() })
            .advise(&samples)
            .unwrap();
        let sequential = OptimizationAdvisor::new(AdvisorConfig { parallel: false, ..Default::default() })
            .advise(&samples)
            .unwrap();

        assert_eq!(parallel.assignments, sequential.assignments);
        assert_eq!(parallel.recommendations, sequential.recommendations);
    }
}
