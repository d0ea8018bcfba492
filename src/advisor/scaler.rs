//! Batch feature standardization

use super::{FeatureVector, FEATURES};

/// Per-feature parameters fitted on one batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardScaler {
    /// Per-feature mean
    pub mean: FeatureVector,
    /// Per-feature population standard deviation (1.0 for constant features)
    pub scale: FeatureVector,
}

impl StandardScaler {
    /// Fit mean and standard deviation over the rows
    pub fn fit(rows: &[FeatureVector]) -> Self {
        let mut mean = [0.0; FEATURES];
        let mut scale = [1.0; FEATURES];
        if rows.is_empty() {
            return Self { mean, scale };
        }

        let n = rows.len() as f64;
        for j in 0..FEATURES {
            mean[j] = rows.iter().map(|r| r[j]).sum::<f64>() / n;
            let variance = rows.iter().map(|r| (r[j] - mean[j]).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();
            // Constant feature: leave centred values at zero
            if std > f64::EPSILON {
                scale[j] = std;
            }
        }

        Self { mean, scale }
    }

    /// Standardize rows with the fitted parameters
    pub fn transform(&self, rows: &[FeatureVector]) -> Vec<FeatureVector> {
        rows.iter()
            .map(|row| {
                let mut out = [0.0; FEATURES];
                for j in 0..FEATURES {
                    out[j] = (row[j] - self.mean[j]) / self.scale[j];
                }
                out
            })
            .collect()
    }

    /// Fit and transform in one step
    pub fn fit_transform(rows: &[FeatureVector]) -> (Self, Vec<FeatureVector>) {
        let scaler = Self::fit(rows);
        let scaled = scaler.transform(rows);
        (scaler, scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_mean_unit_variance() {
        let rows = vec![[10.0, 5.0, 5.0], [12.0, 6.0, 4.0], [900.0, 95.0, 90.0], [500.0, 50.0, 50.0]];
        let (_, scaled) = StandardScaler::fit_transform(&rows);

        for j in 0..FEATURES {
            let mean: f64 = scaled.iter().map(|r| r[j]).sum::<f64>() / scaled.len() as f64;
            let var: f64 = scaled.iter().map(|r| (r[j] - mean).powi(2)).sum::<f64>() / scaled.len() as f64;
            assert!(mean.abs() < 1e-9);
            assert!((var - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_feature() {
        let rows = vec![[5.0, 1.0, 7.0], [5.0, 3.0, 7.0]];
        let (scaler, scaled) = StandardScaler::fit_transform(&rows);
        assert_eq!(scaler.scale[0], 1.0);
        assert_eq!(scaled[0][0], 0.0);
        assert_eq!(scaled[1][2], 0.0);
        assert!((scaled[0][1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_batch() {
        let (scaler, scaled) = StandardScaler::fit_transform(&[]);
        assert_eq!(scaler.mean, [0.0; FEATURES]);
        assert!(scaled.is_empty());
    }
}
