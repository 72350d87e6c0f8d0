//! Gauge integrators: acceleration gauge scale and flight path slope.

use serde::{Deserialize, Serialize};

use crate::constants::{gauges, G};
use crate::rolling::RollingArray;

/// Full-scale deflection of the acceleration gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccScale {
    #[default]
    TwoG,
    FourG,
    EightG,
}

impl AccScale {
    pub fn max_g(self) -> f64 {
        match self {
            AccScale::TwoG => 2.0,
            AccScale::FourG => 4.0,
            AccScale::EightG => 8.0,
        }
    }

    /// Smallest scale that fits `peak_g` with 5% headroom.
    pub fn for_peak(peak_g: f64) -> AccScale {
        if peak_g <= 2.1 {
            AccScale::TwoG
        } else if peak_g <= 4.2 {
            AccScale::FourG
        } else {
            AccScale::EightG
        }
    }
}

/// Picks the acceleration gauge scale from the peak reading over a
/// 3 second window. The scale grows immediately when a reading overflows it
/// and shrinks only when the window expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccScaleSelector {
    pub scale: AccScale,
    peak_g: f64,
    expiration: f64,
}

impl Default for AccScaleSelector {
    fn default() -> Self {
        Self {
            scale: AccScale::TwoG,
            peak_g: -1.0,
            expiration: -1.0,
        }
    }
}

impl AccScaleSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's acceleration vector (m/s²) and return the scale.
    pub fn update(&mut self, simt: f64, acc: [f64; 3], ground_contact: bool) -> AccScale {
        let max_g = acc.iter().fold(0.0_f64, |m, a| m.max(a.abs())) / G;
        self.peak_g = self.peak_g.max(max_g);

        let overflow = max_g > self.scale.max_g() * gauges::ACC_SCALE_OVERSHOOT;
        if ground_contact || overflow || simt >= self.expiration {
            self.scale = AccScale::for_peak(self.peak_g);
            self.expiration = simt + gauges::ACC_SCALE_HOLD_SECONDS;
            self.peak_g = max_g;
        }
        self.scale
    }
}

/// Estimates the flight path angle from rolling sums of altitude change and
/// ground distance.
#[derive(Debug, Clone)]
pub struct SlopeEstimator {
    altitude_deltas: RollingArray,
    distances: RollingArray,
    next_update: f64,
    last_update: f64,
    last_altitude: f64,
    valid: bool,
    slope: f64,
}

impl Default for SlopeEstimator {
    fn default() -> Self {
        Self::new(gauges::SLOPE_SAMPLES)
    }
}

impl SlopeEstimator {
    pub fn new(samples: usize) -> Self {
        Self {
            altitude_deltas: RollingArray::new(samples),
            distances: RollingArray::new(samples),
            next_update: 0.0,
            last_update: 0.0,
            last_altitude: 0.0,
            valid: false,
            slope: 0.0,
        }
    }

    /// Current slope in radians; positive is climbing.
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn update(&mut self, simt: f64, altitude: f64, airspeed: f64, ground_contact: bool) -> f64 {
        if ground_contact {
            self.valid = false;
            self.slope = 0.0;
            return self.slope;
        }

        // time jumped backwards (scenario reload): start over
        let rewound = self.next_update - simt > 1.0;
        if !self.valid || rewound {
            self.altitude_deltas.clear();
            self.distances.clear();
        } else if simt >= self.next_update {
            self.altitude_deltas.add_sample(altitude - self.last_altitude);
            self.distances.add_sample(airspeed * (simt - self.last_update));
            self.slope = slope_from_sums(self.altitude_deltas.sum(), self.distances.sum());
        } else {
            return self.slope;
        }

        self.next_update = simt + gauges::SLOPE_REFRESH;
        self.last_update = simt;
        self.last_altitude = altitude;
        self.valid = true;
        self.slope
    }
}

/// `atan(a / sqrt(c² - a²))` for rise `a` over path length `c`.
pub fn slope_from_sums(rise: f64, path: f64) -> f64 {
    if path <= 0.0 {
        return 0.0;
    }
    let run_sq = path * path - rise * rise;
    if run_sq <= 0.0 {
        return std::f64::consts::FRAC_PI_2.copysign(rise);
    }
    (rise / run_sq.sqrt()).atan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_for_peak() {
        assert_eq!(AccScale::for_peak(1.0), AccScale::TwoG);
        assert_eq!(AccScale::for_peak(2.1), AccScale::TwoG);
        assert_eq!(AccScale::for_peak(3.0), AccScale::FourG);
        assert_eq!(AccScale::for_peak(5.0), AccScale::EightG);
    }

    #[test]
    fn test_scale_grows_immediately_shrinks_after_hold() {
        let mut sel = AccScaleSelector::new();
        assert_eq!(sel.update(0.0, [0.0, 0.0, G], false), AccScale::TwoG);
        assert_eq!(sel.update(0.5, [0.0, 0.0, 3.0 * G], false), AccScale::FourG);
        // the 3G reading is held for the window that started with it
        assert_eq!(sel.update(1.0, [0.0, 0.0, G], false), AccScale::FourG);
        assert_eq!(sel.update(3.6, [0.0, 0.0, G], false), AccScale::FourG);
        assert_eq!(sel.update(6.7, [0.0, 0.0, G], false), AccScale::TwoG);
    }

    #[test]
    fn test_slope_from_sums() {
        assert_eq!(slope_from_sums(0.0, 0.0), 0.0);
        let s = slope_from_sums(1.0, 2.0);
        assert!((s - std::f64::consts::FRAC_PI_6).abs() < 1e-12);
        assert!(slope_from_sums(-1.0, 2.0) < 0.0);
    }

    #[test]
    fn test_slope_estimator_climb() {
        let mut est = SlopeEstimator::default();
        let mut simt = 0.0;
        let mut alt = 1000.0;
        // climb 10 m/s at 100 m/s airspeed
        for _ in 0..200 {
            est.update(simt, alt, 100.0, false);
            simt += 0.02;
            alt += 10.0 * 0.02;
        }
        let expected = (10.0_f64 / (100.0_f64 * 100.0 - 100.0).sqrt()).atan();
        assert!((est.slope() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_slope_zero_on_ground() {
        let mut est = SlopeEstimator::default();
        est.update(0.0, 10.0, 50.0, false);
        est.update(0.1, 20.0, 50.0, false);
        assert_eq!(est.update(0.2, 0.0, 0.0, true), 0.0);
    }
}
