use geo_types::{coord, Coord};
use serde::{Deserialize, Serialize};

/// A point in device units. Only ever produced by [`CoordinateTransform`].
pub type Position = Coord<i64>;

/// Rounds a device coordinate the way the plotter files always have been:
/// half away from zero.
pub fn round_device(value: f64) -> i64 {
    value.round() as i64
}

/// [`round_device`] for values that come straight from the input. `None`
/// when the result is not a representable device coordinate.
pub fn checked_round(value: f64) -> Option<i64> {
    let rounded = value.round();
    // `i64::MAX as f64` is 2^63, one past the largest coordinate.
    if rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Some(rounded as i64)
    } else {
        None
    }
}

/// Maps HPGL plotter units onto device units.
///
/// `x' = round((x + x_offset) / x_div * scale)`, same for y.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    pub x_div: f64,
    pub y_div: f64,
    pub x_offset: f64,
    pub y_offset: f64,
    pub scale: f64,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self {
            x_div: 4.0,
            y_div: 4.0,
            x_offset: 0.0,
            y_offset: 0.0,
            scale: 1.0,
        }
    }
}

impl CoordinateTransform {
    /// Absolute position. `None` if it falls outside the device range.
    pub fn apply(&self, raw_x: f64, raw_y: f64) -> Option<Position> {
        Some(coord! {
            x: checked_round((raw_x + self.x_offset) / self.x_div * self.scale)?,
            y: checked_round((raw_y + self.y_offset) / self.y_div * self.scale)?
        })
    }

    /// Relative displacement. Offsets don't apply to a delta.
    pub fn apply_delta(&self, raw_dx: f64, raw_dy: f64) -> Option<Position> {
        Some(coord! {
            x: checked_round(raw_dx / self.x_div * self.scale)?,
            y: checked_round(raw_dy / self.y_div * self.scale)?
        })
    }

    /// Circle radius, measured along the x axis.
    pub fn apply_length(&self, raw: f64) -> Option<i64> {
        checked_round(raw / self.x_div * self.scale)
    }
}

#[cfg(test)]
mod test {
    use super::{checked_round, round_device, CoordinateTransform};
    use geo_types::coord;

    fn unit() -> CoordinateTransform {
        CoordinateTransform {
            x_div: 1.0,
            y_div: 1.0,
            ..CoordinateTransform::default()
        }
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(round_device(2.5), 3);
        assert_eq!(round_device(-2.5), -3);
        assert_eq!(round_device(2.4999), 2);
    }

    #[test]
    fn test_default_divides_by_four() {
        let tx = CoordinateTransform::default();
        assert_eq!(tx.apply(8948.0, 3855.0), Some(coord! {x: 2237, y: 964}));
        assert_eq!(tx.apply(6.0, -6.0), Some(coord! {x: 2, y: -2}));
    }

    #[test]
    fn test_offsets_apply_before_division() {
        let tx = CoordinateTransform {
            x_offset: 40.0,
            y_offset: -40.0,
            ..CoordinateTransform::default()
        };
        assert_eq!(tx.apply(0.0, 0.0), Some(coord! {x: 10, y: -10}));
        assert_eq!(tx.apply_delta(0.0, 0.0), Some(coord! {x: 0, y: 0}));
    }

    #[test]
    fn test_scale_is_linear() {
        let base = unit();
        for k in [2.0, 3.0, 0.5] {
            let scaled = CoordinateTransform { scale: k, ..base };
            for (x, y) in [(100.0, 250.0), (-37.0, 12.0), (1001.0, 3.0)] {
                let p = base.apply(x, y).unwrap();
                let q = scaled.apply(x, y).unwrap();
                assert!((q.x as f64 - p.x as f64 * k).abs() <= 1.0);
                assert!((q.y as f64 - p.y as f64 * k).abs() <= 1.0);
            }
        }
    }

    #[test]
    fn test_length_uses_x_divisor() {
        let tx = CoordinateTransform {
            y_div: 100.0,
            scale: 2.0,
            ..CoordinateTransform::default()
        };
        assert_eq!(tx.apply_length(62.0), Some(31));
    }

    #[test]
    fn test_huge_values_are_out_of_range() {
        assert_eq!(checked_round(-9.0e18), Some(-9_000_000_000_000_000_000));
        assert_eq!(checked_round(i64::MAX as f64), None);
        assert_eq!(checked_round(-1.0e19), None);
        assert_eq!(checked_round(f64::NAN), None);

        let tx = unit();
        assert_eq!(tx.apply(1.0e30, 0.0), None);
        assert_eq!(tx.apply(0.0, -1.0e30), None);
        assert_eq!(tx.apply_delta(1.0e30, 0.0), None);
        assert_eq!(tx.apply_length(1.0e30), None);
    }
}
