use rand::Rng;
use serde::{Deserialize, Serialize};

/// Sky condition reported with every reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkyStatus {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Windy,
    Precipitation,
}

impl SkyStatus {
    pub const ALL: [SkyStatus; 5] = [
        SkyStatus::Sunny,
        SkyStatus::PartlyCloudy,
        SkyStatus::Cloudy,
        SkyStatus::Windy,
        SkyStatus::Precipitation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkyStatus::Sunny => "sunny",
            SkyStatus::PartlyCloudy => "partly_cloudy",
            SkyStatus::Cloudy => "cloudy",
            SkyStatus::Windy => "windy",
            SkyStatus::Precipitation => "precipitation",
        }
    }
}

impl std::fmt::Display for SkyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One published sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature: f64,
    pub status: SkyStatus,
}

// Zero-based months, January = 0.
const WINTER_MONTHS: [u32; 6] = [0, 1, 2, 3, 10, 11];
const SUMMER_MONTHS: [u32; 3] = [6, 7, 8];

/// Stateful random-walk weather generator.
///
/// Temperature starts at a seasonal baseline and drifts by a
/// triangular-distributed step per tick whose mode leans colder in
/// winter and warmer in summer. Sky status is redrawn uniformly on
/// every step.
#[derive(Debug, Clone)]
pub struct WeatherModel {
    temperature: f64,
    status: SkyStatus,
    month: u32,
}

impl WeatherModel {
    /// Creates a model for a zero-based month.
    pub fn new(month: u32) -> Self {
        let temperature = if WINTER_MONTHS.contains(&month) {
            40.0
        } else if SUMMER_MONTHS.contains(&month) {
            85.0
        } else {
            70.0
        };
        Self {
            temperature,
            status: SkyStatus::Sunny,
            month,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn status(&self) -> SkyStatus {
        self.status
    }

    /// Advances the walk by one tick.
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        let mode = if WINTER_MONTHS.contains(&self.month) {
            -1.0
        } else if SUMMER_MONTHS.contains(&self.month) {
            1.0
        } else {
            0.0
        };
        self.temperature += triangular(rng, -10.0, 10.0, mode).clamp(-20.0, 100.0);
        self.status = SkyStatus::ALL[rng.gen_range(0..SkyStatus::ALL.len())];
    }

    /// Snapshots the current state as a publishable reading.
    pub fn reading(&self) -> WeatherReading {
        WeatherReading {
            temperature: self.temperature,
            status: self.status,
        }
    }
}

/// Samples a triangular distribution on [low, high] with the given mode
/// by inverse transform.
fn triangular<R: Rng>(rng: &mut R, low: f64, high: f64, mode: f64) -> f64 {
    let u: f64 = rng.gen_range(0.0..1.0);
    let cut = (mode - low) / (high - low);
    if u < cut {
        low + (u * (high - low) * (mode - low)).sqrt()
    } else {
        high - ((1.0 - u) * (high - low) * (high - mode)).sqrt()
    }
}
