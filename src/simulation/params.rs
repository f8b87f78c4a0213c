//! Numerical parameters of one simulation run
//!
//! `Parameters` holds the run length `t_max`, the micro-step `dt` and the
//! sampling interval `t_sample`. Derived counts:
//! - `steps_per_sample = t_sample / dt`
//! - `sample_count = t_max / t_sample`
//!
//! Both ratios must be (within `RATIO_TOLERANCE`) positive integers;
//! floating-point noise such as `0.003 / 0.001 = 2.9999999999999996` is
//! rounded to the nearest integer, a genuinely fractional ratio is rejected.

use super::error::SimError;
use super::states::BodySpec;

/// Relative tolerance when checking that a ratio is an integer
pub const RATIO_TOLERANCE: f64 = 1e-9;

/// Largest accepted `t_sample / dt` or `t_max / t_sample`
pub const MAX_RATIO: f64 = 1e12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub t_max: f64, // total duration
    pub dt: f64, // micro-step size
    pub t_sample: f64, // sampling interval
}

impl Parameters {
    pub fn new(t_max: f64, dt: f64, t_sample: f64) -> Self {
        Self { t_max, dt, t_sample }
    }

    /// Check all three values, fail on the first bad one
    pub fn validate(&self) -> Result<(), SimError> {
        positive("t_max", self.t_max)?;
        positive("dt", self.dt)?;
        positive("t_sample", self.t_sample)?;
        self.total_steps()?;
        Ok(())
    }

    /// Micro-steps over the whole run, rejected if it overflows `usize`
    pub fn total_steps(&self) -> Result<usize, SimError> {
        let steps = self.steps_per_sample()?;
        let samples = self.sample_count()?;
        steps.checked_mul(samples).ok_or_else(|| {
            SimError::invalid("t_max", format!("{samples} samples of {steps} steps overflow the step counter"))
        })
    }

    /// Micro-steps between two samples
    pub fn steps_per_sample(&self) -> Result<usize, SimError> {
        integer_ratio("t_sample", self.t_sample, self.dt, "dt")
    }

    /// Samples after the initial one
    pub fn sample_count(&self) -> Result<usize, SimError> {
        integer_ratio("t_max", self.t_max, self.t_sample, "t_sample")
    }
}

fn positive(field: &str, value: f64) -> Result<(), SimError> {
    if !value.is_finite() {
        return Err(SimError::invalid(field, format!("must be finite, got {value}")));
    }
    if value <= 0.0 {
        return Err(SimError::invalid(field, format!("must be > 0, got {value}")));
    }
    Ok(())
}

fn integer_ratio(field: &str, num: f64, den: f64, den_name: &str) -> Result<usize, SimError> {
    let ratio = num / den;
    let rounded = ratio.round();
    if !ratio.is_finite() || rounded < 1.0 {
        return Err(SimError::invalid(
            field,
            format!("must be a positive multiple of {den_name} ({den}), got {num}"),
        ));
    }
    if rounded > MAX_RATIO {
        return Err(SimError::invalid(
            field,
            format!("{num} / {den_name} ({den}) exceeds {MAX_RATIO:e}"),
        ));
    }
    if (ratio - rounded).abs() > RATIO_TOLERANCE * rounded {
        return Err(SimError::invalid(
            field,
            format!("{num} is not an integer multiple of {den_name} ({den})"),
        ));
    }
    Ok(rounded as usize)
}

/// Check every body spec; `field` names the body index, e.g. `bodies[2].mass`
pub fn validate_bodies(specs: &[BodySpec]) -> Result<(), SimError> {
    if specs.is_empty() {
        return Err(SimError::EmptyChain);
    }
    for (i, s) in specs.iter().enumerate() {
        let field = |name: &str| format!("bodies[{i}].{name}");

        if !s.mass.is_finite() || s.mass <= 0.0 {
            return Err(SimError::invalid(field("mass"), format!("must be finite and > 0, got {}", s.mass)));
        }
        if !s.k.is_finite() || s.k < 0.0 {
            return Err(SimError::invalid(field("k"), format!("must be finite and >= 0, got {}", s.k)));
        }
        for (name, value) in [("rest_length", s.rest_length), ("x0", s.x0), ("v0", s.v0)] {
            if !value.is_finite() {
                return Err(SimError::invalid(field(name), format!("must be finite, got {value}")));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_counts() {
        let p = Parameters::new(10.0, 0.001, 0.1);
        assert!(p.validate().is_ok());
        assert_eq!(p.steps_per_sample().unwrap(), 100);
        assert_eq!(p.sample_count().unwrap(), 100);
    }

    #[test]
    fn float_noise_is_rounded_not_floored() {
        // 0.003 / 0.001 evaluates to 2.9999999999999996
        let p = Parameters::new(0.3, 0.001, 0.003);
        assert_eq!(p.steps_per_sample().unwrap(), 3);
    }

    #[test]
    fn fractional_ratio_is_rejected() {
        let p = Parameters::new(1.0, 0.001, 0.0025);
        let err = p.validate().unwrap_err();
        assert_eq!(err.field(), Some("t_sample"));

        let p = Parameters::new(1.05, 0.001, 0.1);
        assert_eq!(p.validate().unwrap_err().field(), Some("t_max"));
    }

    #[test]
    fn sample_shorter_than_step_is_rejected() {
        let p = Parameters::new(1.0, 0.1, 0.01);
        assert_eq!(p.validate().unwrap_err().field(), Some("t_sample"));
    }

    #[test]
    fn non_positive_values_are_rejected() {
        assert_eq!(Parameters::new(0.0, 0.1, 0.1).validate().unwrap_err().field(), Some("t_max"));
        assert_eq!(Parameters::new(1.0, -0.1, 0.1).validate().unwrap_err().field(), Some("dt"));
        assert_eq!(Parameters::new(1.0, f64::NAN, 0.1).validate().unwrap_err().field(), Some("dt"));
        assert_eq!(Parameters::new(1.0, 0.1, 0.0).validate().unwrap_err().field(), Some("t_sample"));
    }

    #[test]
    fn huge_ratios_are_rejected() {
        let p = Parameters::new(1e25, 1.0, 1.0);
        assert_eq!(p.validate().unwrap_err().field(), Some("t_max"));

        let p = Parameters::new(1.0, 1e-20, 1.0);
        assert_eq!(p.validate().unwrap_err().field(), Some("t_sample"));

        // each ratio under the cap, product past usize
        let p = Parameters::new(1e12, 1e-12, 1.0);
        assert_eq!(p.steps_per_sample().unwrap(), 1_000_000_000_000);
        assert_eq!(p.total_steps().unwrap_err().field(), Some("t_max"));
    }

    #[test]
    fn body_checks_name_the_field() {
        assert_eq!(validate_bodies(&[]), Err(SimError::EmptyChain));

        let good = BodySpec::new(1.0, 10.0, 5.0, 7.0, 0.0);
        let zero_mass = BodySpec { mass: 0.0, ..good };
        let err = validate_bodies(&[good, zero_mass]).unwrap_err();
        assert_eq!(err.field(), Some("bodies[1].mass"));

        let neg_k = BodySpec { k: -1.0, ..good };
        assert_eq!(validate_bodies(&[neg_k]).unwrap_err().field(), Some("bodies[0].k"));

        let inf_x = BodySpec { x0: f64::INFINITY, ..good };
        assert_eq!(validate_bodies(&[inf_x]).unwrap_err().field(), Some("bodies[0].x0"));

        // slack spring is allowed
        let free = BodySpec { k: 0.0, ..good };
        assert!(validate_bodies(&[good, free]).is_ok());
    }
}
