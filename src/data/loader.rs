// ============================================================
// Layer 4 - Recording Loader
// ============================================================
// Loads a recorded sensor stream from a CSV file.
//
// Expected layout, one synchronised sample per line:
//
//   acc_x,acc_y,acc_z,mag_x,mag_y,mag_z,gyr_x,gyr_y,gyr_z
//   0.12,9.75,0.31,-12.0,30.5,-40.1,0.01,0.00,-0.02
//   ...
//
// Blank lines and lines starting with '#' are ignored, as is a
// header when it is the first line with content. Anything else
// that does not parse into nine numbers is an error naming the
// offending line.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{bail, Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::sensor::{SensorReading, Triaxial};
use crate::domain::traits::SampleSource;

/// Number of numeric columns in one CSV row
pub const COLUMNS: usize = 9;

pub struct RecordingLoader {
    path: PathBuf,
}

impl RecordingLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SampleSource for RecordingLoader {
    fn load_all(&self) -> Result<Vec<SensorReading>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read recording '{}'", self.path.display()))?;

        let readings = parse_recording(&text)
            .with_context(|| format!("Malformed recording '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded {} readings from '{}'",
            readings.len(),
            self.path.display()
        );
        Ok(readings)
    }
}

/// Parse CSV text into readings.
pub fn parse_recording(text: &str) -> Result<Vec<SensorReading>> {
    let mut readings    = Vec::new();
    let mut header_seen = false;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line    = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        // Only the first line with content may be a header
        let first_content = !header_seen;
        header_seen = true;
        if first_content && fields.iter().all(|f| f.parse::<f32>().is_err()) {
            tracing::debug!("Skipping header on line {}", line_no);
            continue;
        }

        if fields.len() != COLUMNS {
            bail!("line {line_no}: expected {COLUMNS} columns, found {}", fields.len());
        }

        let mut values = [0.0f32; COLUMNS];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field
                .parse()
                .with_context(|| format!("line {line_no}: '{field}' is not a number"))?;
        }

        readings.push(SensorReading::new(
            Triaxial::new(values[0], values[1], values[2]),
            Triaxial::new(values[3], values[4], values[5]),
            Triaxial::new(values[6], values[7], values[8]),
        ));
    }

    Ok(readings)
}
