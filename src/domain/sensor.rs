// ============================================================
// Layer 3 - Sensors and Triaxial Readings
// ============================================================
// The models were trained on SHL recordings made with an
// Android logger. Each model input step holds three scalars,
// one per sensor, and each scalar is the magnitude of a
// triaxial reading:
//
//   AccMag - accelerometer, gravity included, in m/s²
//   MagMag - calibrated magnetic field, in µT
//   GyrMag - gyroscope, in rad/s
//
// Recordings made on iOS report acceleration in g, so they are
// scaled by standard gravity before taking the magnitude.
// Rotation rate and magnetic field already share Android units.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard gravity, used to convert g into m/s²
pub const STANDARD_GRAVITY: f32 = 9.81;

/// A magnitude channel fed to the model.
/// The discriminant is the feature index inside one time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sensor {
    AccMag = 0,
    MagMag = 1,
    GyrMag = 2,
}

impl Sensor {
    /// Sensors in feature order
    pub const ALL: [Sensor; 3] = [Sensor::AccMag, Sensor::MagMag, Sensor::GyrMag];

    /// Position of this sensor's value in each time step
    pub fn feature_index(self) -> usize {
        self as usize
    }

    /// File stem of the fitted scaler parameters for this sensor
    pub fn scaler_file_stem(self) -> &'static str {
        match self {
            Sensor::AccMag => "acc_mag.scaler",
            Sensor::MagMag => "mag_mag.scaler",
            Sensor::GyrMag => "gyr_mag.scaler",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sensor::AccMag => "Acceleration Magnitude",
            Sensor::MagMag => "Magnetometer Magnitude",
            Sensor::GyrMag => "Gyrosensor Magnitude",
        };
        f.write_str(s)
    }
}

/// A three-axis sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Triaxial {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Triaxial {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Euclidean norm of the three axes
    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Platform a recording was captured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceFormat {
    /// Already in the units the models were trained on
    #[default]
    Android,
    /// Acceleration reported in g
    Ios,
}

/// One synchronised sample of all three sensors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorReading {
    pub acc: Triaxial,
    pub mag: Triaxial,
    pub gyr: Triaxial,
}

impl SensorReading {
    pub fn new(acc: Triaxial, mag: Triaxial, gyr: Triaxial) -> Self {
        Self { acc, mag, gyr }
    }

    /// Magnitudes in Sensor::ALL order, converted to Android units
    pub fn magnitudes(&self, format: DeviceFormat) -> [f32; 3] {
        let acc = match format {
            DeviceFormat::Android => self.acc,
            DeviceFormat::Ios     => self.acc.scale(STANDARD_GRAVITY),
        };
        [acc.magnitude(), self.mag.magnitude(), self.gyr.magnitude()]
    }
}
