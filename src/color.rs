//! Diverging color scale for monthly-return heat cells.
//!
//! Returns are clamped to `[-max, max]` and normalized to `[-1, 1]`. The loss
//! half blends red → amber, the gain half amber → green, and opacity grows
//! with magnitude so near-zero months read as muted.

use serde::Serialize;

use crate::error::AppError;

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

pub const LOSS: Rgb = Rgb(217, 75, 75);
pub const NEUTRAL: Rgb = Rgb(201, 162, 77);
pub const GAIN: Rgb = Rgb(76, 175, 80);

/// Fill and border of a cell without data.
pub const NO_DATA_FILL: Rgb = Rgb(0x0B, 0x0B, 0x0B);
pub const NO_DATA_BORDER: Rgb = Rgb(0x15, 0x15, 0x15);

pub const MIN_OPACITY: f64 = 0.35;
pub const MAX_OPACITY: f64 = 0.90;

/// Appearance of one heat cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellStyle {
    NoData,
    Filled { rgb: Rgb, opacity: f64 },
}

impl CellStyle {
    /// Flatten onto an opaque background; terminals cannot draw alpha.
    pub fn composite(self, background: Rgb) -> Rgb {
        match self {
            CellStyle::NoData => NO_DATA_FILL,
            CellStyle::Filled { rgb, opacity } => Rgb(
                blend(background.0, rgb.0, opacity),
                blend(background.1, rgb.1, opacity),
                blend(background.2, rgb.2, opacity),
            ),
        }
    }
}

/// Symmetric domain `[-max, max]` mapped onto the loss/neutral/gain ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatScale {
    max: f64,
}

impl HeatScale {
    pub fn new(max: f64) -> Result<Self, AppError> {
        if max.is_finite() && max > 0.0 {
            Ok(Self { max })
        } else {
            Err(AppError::new(2, format!("Invalid heat domain ±{max} (must be finite and > 0).")))
        }
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Style for a value; `None` and non-finite values get the no-data look.
    pub fn style(&self, value: Option<f64>) -> CellStyle {
        let Some(r) = value.filter(|r| r.is_finite()) else {
            return CellStyle::NoData;
        };

        let v = r.clamp(-self.max, self.max) / self.max;
        let opacity = MIN_OPACITY + v.abs() * (MAX_OPACITY - MIN_OPACITY);
        let rgb = if v < 0.0 {
            interp(LOSS, NEUTRAL, v + 1.0)
        } else {
            interp(NEUTRAL, GAIN, v)
        };

        CellStyle::Filled { rgb, opacity }
    }
}

impl Default for HeatScale {
    fn default() -> Self {
        Self {
            max: crate::domain::DEFAULT_HEAT_MAX,
        }
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
    v.round().clamp(0.0, 255.0) as u8
}

fn interp(c1: Rgb, c2: Rgb, t: f64) -> Rgb {
    Rgb(lerp(c1.0, c2.0, t), lerp(c1.1, c2.1, t), lerp(c1.2, c2.2, t))
}

fn blend(bg: u8, fg: u8, alpha: f64) -> u8 {
    lerp(bg, fg, alpha.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> HeatScale {
        HeatScale::new(0.10).unwrap()
    }

    fn filled(style: CellStyle) -> (Rgb, f64) {
        match style {
            CellStyle::Filled { rgb, opacity } => (rgb, opacity),
            CellStyle::NoData => panic!("expected a filled cell"),
        }
    }

    #[test]
    fn zero_is_neutral_at_min_opacity() {
        let (rgb, opacity) = filled(scale().style(Some(0.0)));
        assert_eq!(rgb, NEUTRAL);
        assert!((opacity - MIN_OPACITY).abs() < 1e-12);
    }

    #[test]
    fn domain_edges_are_saturated() {
        let (rgb, opacity) = filled(scale().style(Some(0.10)));
        assert_eq!(rgb, GAIN);
        assert!((opacity - MAX_OPACITY).abs() < 1e-12);

        let (rgb, opacity) = filled(scale().style(Some(-0.10)));
        assert_eq!(rgb, LOSS);
        assert!((opacity - MAX_OPACITY).abs() < 1e-12);
    }

    #[test]
    fn values_outside_domain_are_clamped() {
        assert_eq!(scale().style(Some(0.5)), scale().style(Some(0.10)));
        assert_eq!(scale().style(Some(-3.0)), scale().style(Some(-0.10)));
    }

    #[test]
    fn missing_values_map_to_no_data_for_any_domain() {
        for max in [0.01, 0.10, 5.0] {
            let s = HeatScale::new(max).unwrap();
            assert_eq!(s.style(None), CellStyle::NoData);
            assert_eq!(s.style(Some(f64::NAN)), CellStyle::NoData);
            assert_eq!(s.style(Some(f64::INFINITY)), CellStyle::NoData);
        }
        assert_ne!(scale().style(Some(0.0)), CellStyle::NoData);
    }

    #[test]
    fn halfway_gain_interpolates_channels() {
        let unit = HeatScale::new(1.0).unwrap();
        let (rgb, opacity) = filled(unit.style(Some(0.5)));
        // (201 + 76) / 2 = 138.5 rounds up, (162 + 175) / 2 = 168.5, (77 + 80) / 2 = 78.5
        assert_eq!(rgb, Rgb(139, 169, 79));
        assert!((opacity - 0.625).abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_domains() {
        assert!(HeatScale::new(0.0).is_err());
        assert!(HeatScale::new(-0.1).is_err());
        assert!(HeatScale::new(f64::NAN).is_err());
    }

    #[test]
    fn composite_blends_toward_background() {
        let black = Rgb(0, 0, 0);
        let style = CellStyle::Filled { rgb: Rgb(200, 100, 50), opacity: 0.5 };
        assert_eq!(style.composite(black), Rgb(100, 50, 25));
        assert_eq!(CellStyle::NoData.composite(black), NO_DATA_FILL);
        assert_eq!(GAIN.hex(), "#4CAF50");
    }
}
