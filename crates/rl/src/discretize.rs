use crate::config::AgentConfig;

/// Discrete state of one flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    pub aoi_bin: usize,
    pub cqi_bin: usize,
}

/// Linear bucket index of `value` in `[0, max_value]` split into `bins` buckets.
///
/// `value == max_value` lands in the last bucket. Negative, over-range and NaN
/// inputs are clamped into `[0, bins - 1]` without complaint.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn bin_index(value: f64, max_value: f64, bins: usize) -> usize {
    let last = bins.saturating_sub(1) as f64;
    let scaled = (value / max_value * bins as f64).floor();
    // NaN survives clamp and then casts to 0
    scaled.clamp(0.0, last) as usize
}

/// Maps raw `(aoi, cqi)` readings onto table coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Discretizer {
    max_aoi: f64,
    max_cqi: f64,
    aoi_bins: usize,
    cqi_bins: usize,
}

impl Discretizer {
    #[must_use]
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            max_aoi: config.max_aoi,
            max_cqi: config.max_cqi,
            aoi_bins: config.aoi_bins,
            cqi_bins: config.cqi_bins,
        }
    }

    #[must_use]
    pub fn discretize(&self, aoi: f64, cqi: f64) -> State {
        State {
            aoi_bin: bin_index(aoi, self.max_aoi, self.aoi_bins),
            cqi_bin: bin_index(cqi, self.max_cqi, self.cqi_bins),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_value_maps_to_last_bin() {
        assert_eq!(bin_index(10_000.0, 10_000.0, 10), 9);
        assert_eq!(bin_index(15.0, 15.0, 5), 4);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(bin_index(-3.0, 10.0, 4), 0);
        assert_eq!(bin_index(1e9, 10.0, 4), 3);
        assert_eq!(bin_index(f64::NAN, 10.0, 4), 0);
        assert_eq!(bin_index(f64::INFINITY, 10.0, 4), 3);
    }

    #[test]
    fn interior_values_floor() {
        assert_eq!(bin_index(0.0, 10.0, 4), 0);
        assert_eq!(bin_index(2.49, 10.0, 4), 0);
        assert_eq!(bin_index(2.5, 10.0, 4), 1);
        assert_eq!(bin_index(9.99, 10.0, 4), 3);
    }
}
