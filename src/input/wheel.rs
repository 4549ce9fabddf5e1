use crate::options::WheelOptions;

/// Convert a raw wheel `delta_y` into a signed, logarithmically flattened
/// control delta: `sign(dy) * ln(1 + |dy|) / divisor`.
///
/// Large trackpad/mouse deltas are compressed so a single notch and a fast
/// fling produce comparable steps. Returns `None` for a zero delta.
#[must_use]
pub fn wheel_delta(delta_y: f32, options: &WheelOptions) -> Option<f32> {
    if delta_y == 0.0 || !delta_y.is_finite() {
        return None;
    }
    let divisor = if options.divisor.abs() > f32::EPSILON {
        options.divisor
    } else {
        WheelOptions::DEFAULT_DIVISOR
    };
    let delta = delta_y.signum() * delta_y.abs().ln_1p() / divisor;
    Some(if options.invert { -delta } else { delta })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logarithmic_and_signed() {
        let options = WheelOptions::default();
        let small = wheel_delta(10.0, &options).unwrap();
        let large = wheel_delta(1000.0, &options).unwrap();
        assert!((small - 11.0_f32.ln() / 40.0).abs() < 1e-6);
        assert!(large < small * 3.0);
        assert_eq!(wheel_delta(-10.0, &options), Some(-small));
        assert_eq!(wheel_delta(0.0, &options), None);
    }

    #[test]
    fn invert_flips_sign() {
        let options = WheelOptions {
            invert: true,
            ..WheelOptions::default()
        };
        assert!(wheel_delta(5.0, &options).unwrap() < 0.0);
    }
}
