use serde::{Deserialize, Serialize};

use crate::error::InvalidNumericInput;

// ---------------------------------------------------------------------------
// ThresholdConfig – validated peak settings for one render call
// ---------------------------------------------------------------------------

/// Thresholds and switches for a single peak analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Rows need `y > y_threshold`.
    pub y_threshold: f64,
    /// Rows need `x > x_threshold`.
    pub x_threshold: f64,
    /// Compute the mean of the peak rows and annotate the base chart.
    pub compute_average: bool,
    /// Write a second chart containing only the peak rows.
    pub emit_peak_chart: bool,
}

// ---------------------------------------------------------------------------
// ThresholdInput – raw text as typed into the dialog
// ---------------------------------------------------------------------------

/// Unvalidated dialog contents.
///
/// The Y threshold is entered as `mantissa × 10^exponent` so values such as
/// 2.5×10⁻⁶ can be typed without exponent notation.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdInput {
    pub mantissa: String,
    pub exponent: String,
    pub x_threshold: String,
    pub compute_average: bool,
    pub emit_peak_chart: bool,
}

impl Default for ThresholdInput {
    fn default() -> Self {
        Self {
            mantissa: String::new(),
            exponent: String::new(),
            x_threshold: String::new(),
            compute_average: true,
            emit_peak_chart: true,
        }
    }
}

impl ThresholdInput {
    /// Validate the text fields and build a [`ThresholdConfig`].
    pub fn parse(&self) -> Result<ThresholdConfig, InvalidNumericInput> {
        let mantissa = self.mantissa.trim();
        let exponent = self.exponent.trim();
        if mantissa.is_empty() || exponent.is_empty() {
            return Err(InvalidNumericInput(
                "the Y threshold mantissa and exponent are both required".into(),
            ));
        }

        let mantissa = parse_decimal(mantissa, "mantissa")?;
        let exponent: i32 = exponent.parse().map_err(|_| {
            InvalidNumericInput(format!("exponent '{exponent}' is not an integer"))
        })?;
        let y_threshold = threshold_value(mantissa, exponent);
        if !y_threshold.is_finite() {
            return Err(InvalidNumericInput(format!(
                "({mantissa}) × 10^({exponent}) is out of range"
            )));
        }

        let x_threshold = match self.x_threshold.trim() {
            "" => 0.0,
            s => parse_decimal(s, "X threshold")?,
        };

        Ok(ThresholdConfig {
            y_threshold,
            x_threshold,
            compute_average: self.compute_average,
            emit_peak_chart: self.emit_peak_chart,
        })
    }
}

/// `mantissa × 10^exponent`.
pub fn threshold_value(mantissa: f64, exponent: i32) -> f64 {
    mantissa * 10f64.powi(exponent)
}

/// Plain decimal with a `.` separator, independent of the user's locale.
fn parse_decimal(s: &str, what: &str) -> Result<f64, InvalidNumericInput> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(InvalidNumericInput(format!(
            "{what} '{s}' is not a valid number (example: (2.5) × 10 ^ (-6))"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn input(mantissa: &str, exponent: &str, x: &str) -> ThresholdInput {
        ThresholdInput {
            mantissa: mantissa.into(),
            exponent: exponent.into(),
            x_threshold: x.into(),
            ..ThresholdInput::default()
        }
    }

    #[test]
    fn mantissa_and_exponent_combine() {
        let cfg = input("2.5", "-6", "").parse().unwrap();
        assert_relative_eq!(cfg.y_threshold, 2.5e-6, max_relative = 1e-12);
        assert_eq!(cfg.x_threshold, 0.0);
        assert!(cfg.compute_average);
        assert!(cfg.emit_peak_chart);
    }

    #[test]
    fn explicit_x_threshold_and_whitespace() {
        let cfg = input(" 1 ", " +3 ", " 12.25 ").parse().unwrap();
        assert_relative_eq!(cfg.y_threshold, 1000.0);
        assert_relative_eq!(cfg.x_threshold, 12.25);
    }

    #[test]
    fn missing_parts_are_rejected() {
        assert!(input("", "-6", "").parse().is_err());
        assert!(input("2.5", "  ", "").parse().is_err());
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        assert!(input("2,5", "-6", "").parse().is_err());
        assert!(input("2.5", "-6.5", "").parse().is_err());
        assert!(input("2.5", "-6", "ten").parse().is_err());
        assert!(input("nan", "0", "").parse().is_err());
        assert!(input("inf", "0", "").parse().is_err());
        assert!(input("1", "400", "").parse().is_err());
    }

    #[test]
    fn checkboxes_pass_through() {
        let cfg = ThresholdInput {
            compute_average: false,
            emit_peak_chart: false,
            ..input("3", "0", "0.5")
        }
        .parse()
        .unwrap();
        assert!(!cfg.compute_average);
        assert!(!cfg.emit_peak_chart);
    }

    #[test]
    fn config_logs_as_json() {
        let cfg = input("2.5", "-6", "1").parse().unwrap();
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"x_threshold\":1.0"), "{json}");
    }
}
