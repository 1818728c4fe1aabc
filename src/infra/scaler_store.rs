// ============================================================
// Layer 6 - Scaler Store
// ============================================================
// Loads the fitted preprocessing parameters for each sensor.
//
// One JSON file per sensor, named after Sensor::scaler_file_stem:
//
//   scalers/
//     acc_mag.scaler.json
//     mag_mag.scaler.json
//     gyr_mag.scaler.json
//
// Each file carries both transformers' parameters, one value
// per window position:
//
//   { "lambdas": [...], "means": [...], "scales": [...] }
//
// The same document is decoded twice, once as the power
// transformer's config and once as the scaler's, so either
// can grow fields without touching the other.

use anyhow::{bail, Context, Result};
use std::{fs, path::PathBuf};

use crate::data::preprocessor::{
    PowerTransformer, PowerTransformerConfig,
    StandardScaler, StandardScalerConfig,
};
use crate::domain::{sensor::Sensor, traits::Preprocessor};

pub struct ScalerStore {
    dir: PathBuf,
}

impl ScalerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, sensor: Sensor) -> PathBuf {
        self.dir.join(format!("{}.json", sensor.scaler_file_stem()))
    }

    /// Load the [PowerTransformer, StandardScaler] chain for one sensor.
    pub fn load(&self, sensor: Sensor, window_length: usize) -> Result<Vec<Box<dyn Preprocessor>>> {
        let path = self.path_for(sensor);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read scaler config '{}'", path.display()))?;
        let doc: serde_json::Value = serde_json::from_str(&json)
            .with_context(|| format!("Invalid JSON in '{}'", path.display()))?;

        let power: PowerTransformerConfig = serde_json::from_value(doc.clone())
            .with_context(|| format!("'{}' has no valid \"lambdas\"", path.display()))?;
        let scaler: StandardScalerConfig = serde_json::from_value(doc)
            .with_context(|| format!("'{}' has no valid \"means\"/\"scales\"", path.display()))?;

        for (name, len) in [
            ("lambdas", power.lambdas.len()),
            ("means",   scaler.means.len()),
            ("scales",  scaler.scales.len()),
        ] {
            if len != window_length {
                bail!(
                    "'{}': {name} has {len} entries but windows have {window_length}",
                    path.display()
                );
            }
        }

        tracing::debug!("Loaded scalers for {} from '{}'", sensor, path.display());
        Ok(vec![
            Box::new(PowerTransformer::new(power)),
            Box::new(StandardScaler::new(scaler)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_scaler(dir: &std::path::Path, sensor: Sensor, len: usize) {
        let doc = serde_json::json!({
            "lambdas": vec![1.0; len],
            "means":   vec![1.0; len],
            "scales":  vec![2.0; len],
        });
        let path = dir.join(format!("{}.json", sensor.scaler_file_stem()));
        fs::write(path, doc.to_string()).unwrap();
    }

    #[test]
    fn test_loads_chain_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_scaler(dir.path(), Sensor::AccMag, 3);

        let chain = ScalerStore::new(dir.path()).load(Sensor::AccMag, 3).unwrap();
        assert_eq!(chain.len(), 2);

        // λ = 1 is the identity, then (x - 1) / 2
        let out = crate::data::preprocessor::apply_all(&chain, vec![5.0, 1.0, 3.0]);
        assert_eq!(out, vec![2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        write_scaler(dir.path(), Sensor::GyrMag, 4);

        let err = ScalerStore::new(dir.path()).load(Sensor::GyrMag, 500).unwrap_err();
        assert!(err.to_string().contains("lambdas has 4 entries"));
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScalerStore::new(dir.path()).load(Sensor::MagMag, 500).unwrap_err();
        assert!(err.to_string().contains("mag_mag.scaler.json"));
    }
}
