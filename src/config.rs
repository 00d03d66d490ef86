use std::io::Read;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::errors::ConvertError;
use crate::geometry::CoordinateTransform;

/// Parameters fixed for one conversion run.
///
/// The defaults suit a Hitachi 671-20: HPGL units are 0.025mm and the
/// plotter steps in 0.1mm, hence the divisor of 4 on both axes. The pen
/// width is in device units (2 * 0.1mm).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ConvertConfig {
    pub x_div: f64,
    pub y_div: f64,
    pub x_offset: f64,
    pub y_offset: f64,
    pub pen_width: f64,
    pub scale: f64,
    /// Prefix the output file with `#` comment lines. Only used by the CLI.
    pub header: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            x_div: 4.0,
            y_div: 4.0,
            x_offset: 0.0,
            y_offset: 0.0,
            pen_width: 2.0,
            scale: 1.0,
            header: true,
        }
    }
}

impl ConvertConfig {
    /// Reads a config from a RON file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<ConvertConfig> {
        let mut reader = std::fs::File::open(path)?;
        let mut data = String::new();
        reader.read_to_string(&mut data)?;
        let config: ConvertConfig = ron::from_str(data.as_str())?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_string(&self) -> String {
        ron::to_string(self).expect("ConvertConfig is plain data and always serializes")
    }

    pub fn validate(&self) -> Result<(), ConvertError> {
        let values = [
            ("x_div", self.x_div),
            ("y_div", self.y_div),
            ("x_offset", self.x_offset),
            ("y_offset", self.y_offset),
            ("pen_width", self.pen_width),
            ("scale", self.scale),
        ];
        if let Some((name, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConvertError::Config(format!("{} must be finite", name)));
        }
        if self.x_div == 0.0 || self.y_div == 0.0 {
            return Err(ConvertError::Config("axis divisors must not be zero".into()));
        }
        if self.pen_width <= 0.0 {
            return Err(ConvertError::Config("pen width must be positive".into()));
        }
        if self.scale <= 0.0 {
            return Err(ConvertError::Config("scale must be positive".into()));
        }
        Ok(())
    }

    pub fn transform(&self) -> CoordinateTransform {
        CoordinateTransform {
            x_div: self.x_div,
            y_div: self.y_div,
            x_offset: self.x_offset,
            y_offset: self.y_offset,
            scale: self.scale,
        }
    }
}

#[cfg(test)]
mod test {
    use super::ConvertConfig;

    #[test]
    fn test_defaults_are_valid() {
        let config = ConvertConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pen_width, 2.0);
        assert_eq!(config.x_div, 4.0);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config: ConvertConfig = ron::from_str("(scale: 2.5, pen_width: 3.0)").unwrap();
        assert_eq!(config.scale, 2.5);
        assert_eq!(config.pen_width, 3.0);
        assert_eq!(config.y_div, 4.0);
        assert!(config.header);
    }

    #[test]
    fn test_round_trip_through_file() {
        let config = ConvertConfig {
            x_offset: 10.0,
            header: false,
            ..ConvertConfig::default()
        };
        let path = std::env::temp_dir().join(format!("hpgl2dxy-config-{}.ron", std::process::id()));
        std::fs::write(&path, config.to_string()).unwrap();
        let loaded = ConvertConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero_div = ConvertConfig {
            x_div: 0.0,
            ..ConvertConfig::default()
        };
        assert!(zero_div.validate().is_err());
        let no_pen = ConvertConfig {
            pen_width: 0.0,
            ..ConvertConfig::default()
        };
        assert!(no_pen.validate().is_err());
        let nan_scale = ConvertConfig {
            scale: f64::NAN,
            ..ConvertConfig::default()
        };
        assert!(nan_scale.validate().is_err());
    }
}
