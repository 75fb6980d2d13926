//! Easing curves for tween interpolation.
//!
//! Names follow the power-curve convention common to web tween engines:
//! `Power1` is quadratic, `Power2` cubic, `Power3` quartic.

use serde::{Deserialize, Serialize};

/// Easing function variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Constant speed.
    Linear,
    /// Quadratic ease-in (slow start).
    Power1In,
    /// Quadratic ease-out (slow end). Default for tweens.
    #[default]
    Power1Out,
    /// Quadratic ease-in-out.
    Power1InOut,
    /// Cubic ease-in.
    Power2In,
    /// Cubic ease-out.
    Power2Out,
    /// Cubic ease-in-out.
    Power2InOut,
    /// Quartic ease-out.
    Power3Out,
}

impl Ease {
    /// Evaluates the curve at `t`.
    ///
    /// Input is clamped to [0, 1]; every variant maps 0 to 0 and 1 to 1.
    #[inline]
    #[must_use]
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Ease::Linear => t,
            Ease::Power1In => t * t,
            Ease::Power1Out => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Ease::Power1InOut => in_out(t, 2),
            Ease::Power2In => t * t * t,
            Ease::Power2Out => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
            Ease::Power2InOut => in_out(t, 3),
            Ease::Power3Out => 1.0 - (1.0 - t).powi(4),
        }
    }
}

#[inline]
fn in_out(t: f32, power: i32) -> f32 {
    if t < 0.5 {
        0.5 * (2.0 * t).powi(power)
    } else {
        1.0 - 0.5 * (2.0 * (1.0 - t)).powi(power)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 8] = [
        Ease::Linear,
        Ease::Power1In,
        Ease::Power1Out,
        Ease::Power1InOut,
        Ease::Power2In,
        Ease::Power2Out,
        Ease::Power2InOut,
        Ease::Power3Out,
    ];

    #[test]
    fn test_endpoints() {
        for ease in ALL {
            assert!(ease.evaluate(0.0).abs() < 1e-6, "{ease:?} at 0");
            assert!((ease.evaluate(1.0) - 1.0).abs() < 1e-6, "{ease:?} at 1");
        }
    }

    #[test]
    fn test_input_clamping() {
        for ease in ALL {
            assert!(ease.evaluate(-0.5).abs() < 1e-6);
            assert!((ease.evaluate(1.5) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ease_out_leads_linear() {
        assert!(Ease::Power2Out.evaluate(0.25) > 0.25);
        assert!(Ease::Power1Out.evaluate(0.25) > 0.25);
        assert!(Ease::Power2In.evaluate(0.25) < 0.25);
    }

    #[test]
    fn test_in_out_is_symmetric() {
        let v = Ease::Power2InOut.evaluate(0.3);
        let mirrored = 1.0 - Ease::Power2InOut.evaluate(0.7);
        assert!((v - mirrored).abs() < 1e-6);
        assert!((Ease::Power1InOut.evaluate(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_power2_out_values() {
        assert!((Ease::Power2Out.evaluate(0.5) - 0.875).abs() < 1e-6);
        assert!((Ease::Power1Out.evaluate(0.5) - 0.75).abs() < 1e-6);
    }
}
