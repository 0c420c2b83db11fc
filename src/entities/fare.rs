use serde::{Deserialize, Serialize};

// fares are quoted in integer currency units and rounded to the nearest 50
pub const FARE_ROUNDING_UNIT: i64 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareConfig {
    pub base_fare: i64,
    pub rate_per_km: i64,
    pub rate_per_minute: i64,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            base_fare: 500,
            rate_per_km: 100,
            rate_per_minute: 20,
        }
    }
}

// admin updates merge field by field, they never replace the whole config
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct FareConfigPatch {
    pub base_fare: Option<i64>,
    pub rate_per_km: Option<i64>,
    pub rate_per_minute: Option<i64>,
}

impl FareConfig {
    pub fn merge(&mut self, patch: FareConfigPatch) {
        if let Some(base_fare) = patch.base_fare {
            self.base_fare = base_fare;
        }
        if let Some(rate_per_km) = patch.rate_per_km {
            self.rate_per_km = rate_per_km;
        }
        if let Some(rate_per_minute) = patch.rate_per_minute {
            self.rate_per_minute = rate_per_minute;
        }
    }

    pub fn estimate(&self, distance_km: f64, duration_minutes: f64) -> i64 {
        let raw = self.base_fare as f64
            + self.rate_per_km as f64 * distance_km
            + self.rate_per_minute as f64 * duration_minutes;

        (raw / FARE_ROUNDING_UNIT as f64).round() as i64 * FARE_ROUNDING_UNIT
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FareEstimate {
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_sums_components_and_rounds() {
        let config = FareConfig {
            base_fare: 500,
            rate_per_km: 100,
            rate_per_minute: 20,
        };

        assert_eq!(config.estimate(10.0, 20.0), 1900);
        // 500 + 1030 + 400 = 1930, nearest 50 is 1950
        assert_eq!(config.estimate(10.3, 20.0), 1950);
        // 500 + 1010 + 400 = 1910, nearest 50 is 1900
        assert_eq!(config.estimate(10.1, 20.0), 1900);
    }

    #[test]
    fn patch_merges_rather_than_replaces() {
        let mut config = FareConfig::default();

        config.merge(FareConfigPatch {
            rate_per_km: Some(150),
            ..Default::default()
        });

        assert_eq!(config.base_fare, 500);
        assert_eq!(config.rate_per_km, 150);
        assert_eq!(config.rate_per_minute, 20);
    }
}
