//! Synthetic transit light curve for display.
//!
//! The waveform is a deterministic parametric model, independent of the
//! classifiers: a flat baseline at flux 1 with a single centered transit
//! whose ingress/egress follow a raised-cosine profile (continuous, zero at
//! the transit edges, 1 at mid-transit).
//!
//! An optional small symmetric perturbation can be added purely for visual
//! realism. The noise is cosmetic and confined to this module's output; it
//! never feeds the ensemble predictor. The seed is an explicit parameter so
//! tests can pin the waveform while interactive callers stay unseeded.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::LightCurvePoint;
use crate::error::PipelineError;

/// Number of samples per synthesized curve.
pub const SAMPLE_COUNT: usize = 100;

/// The window never exceeds this many time units, regardless of period.
pub const MAX_WINDOW: f64 = 10.0;

/// Fraction of the period shown around the transit.
pub const WINDOW_PERIOD_FRACTION: f64 = 0.3;

/// Synthesize the noiseless transit waveform.
///
/// Samples `SAMPLE_COUNT` points over `total_time = min(period * 0.3, 10)`
/// with the transit centered at `total_time / 2`. Flux is exactly 1 outside
/// the transit window and dips to `1 - depth/1e6` at mid-transit.
///
/// `impact` is validated alongside the other parameters for API symmetry but
/// does not alter the trapezoid shape in this model.
pub fn synthesize(
    period: f64,
    depth: f64,
    duration: f64,
    impact: f64,
) -> Result<Vec<LightCurvePoint>, PipelineError> {
    check_param("period", period, true)?;
    check_param("depth", depth, true)?;
    check_param("duration", duration, true)?;
    check_param("impact", impact, false)?;

    let total_time = (period * WINDOW_PERIOD_FRACTION).min(MAX_WINDOW);
    let center = total_time / 2.0;
    let half_duration = duration / 2.0;
    let depth_fraction = depth / 1e6;

    let mut points = Vec::with_capacity(SAMPLE_COUNT);
    for i in 0..SAMPLE_COUNT {
        let t = total_time * i as f64 / (SAMPLE_COUNT as f64 - 1.0);
        let offset = t - center;
        let progress = if offset.abs() < half_duration {
            // Raised-cosine ingress/egress: 0 at the edges, 1 at mid-transit.
            (1.0 + (std::f64::consts::PI * offset / half_duration).cos()) / 2.0
        } else {
            0.0
        };
        points.push(LightCurvePoint {
            time: t,
            flux: 1.0 - depth_fraction * progress,
        });
    }
    Ok(points)
}

/// Synthesize the waveform and add cosmetic Gaussian noise.
///
/// `amplitude` is the noise standard deviation in flux units. A `Some(seed)`
/// makes the perturbation reproducible; `None` draws fresh entropy per call.
pub fn synthesize_with_noise(
    period: f64,
    depth: f64,
    duration: f64,
    impact: f64,
    amplitude: f64,
    seed: Option<u64>,
) -> Result<Vec<LightCurvePoint>, PipelineError> {
    if !(amplitude.is_finite() && amplitude >= 0.0) {
        return Err(PipelineError::LightCurveInput(format!(
            "noise amplitude must be finite and non-negative, got {amplitude}"
        )));
    }

    let mut points = synthesize(period, depth, duration, impact)?;
    if amplitude == 0.0 {
        return Ok(points);
    }

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let normal = Normal::new(0.0, amplitude).map_err(|e| {
        PipelineError::LightCurveInput(format!("invalid noise distribution: {e}"))
    })?;
    for p in &mut points {
        p.flux += normal.sample(&mut rng);
    }
    Ok(points)
}

fn check_param(name: &str, value: f64, must_be_positive: bool) -> Result<(), PipelineError> {
    if !value.is_finite() {
        return Err(PipelineError::LightCurveInput(format!(
            "{name} must be finite, got {value}"
        )));
    }
    if must_be_positive && value <= 0.0 {
        return Err(PipelineError::LightCurveInput(format!(
            "{name} must be positive, got {value}"
        )));
    }
    if !must_be_positive && value < 0.0 {
        return Err(PipelineError::LightCurveInput(format!(
            "{name} must be non-negative, got {value}"
        )));
    }
    Ok(())
}
