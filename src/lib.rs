//! HPGL to Roland DXY plot stream conversion
//!
//! Old pen plotters such as the Hitachi 671-20 speak a small Roland DXY
//! dialect (`M`, `D`, `C`, `J`, `H` ...) and know nothing about HPGL's
//! polygon mode. This library interprets an HPGL command stream, rescales it
//! into device units and emits the equivalent DXY commands. Filled circles
//! and filled rectangles, which HPGL declares with `PM`/`FP`, are synthesized
//! as concentric strokes one pen width apart.
//!
//! # Example
//!
//! ```rust
//! use hpgl2dxy::prelude::*;
//!
//! let config = ConvertConfig {
//!     x_div: 1.0,
//!     y_div: 1.0,
//!     ..ConvertConfig::default()
//! };
//! let commands = convert("PU;PA100,100;PD;PA200,100;PA200,200;", &config).unwrap();
//! let lines: Vec<String> = commands.iter().map(|c| c.to_string()).collect();
//! assert_eq!(lines, vec!["M100,100", "D200,100", "D200,200"]);
//! ```

/// Error taxonomy for the conversion
pub mod errors;

/// Run configuration (divisors, offsets, pen width, scale)
pub mod config;

/// Device positions and the HPGL to device coordinate transform
pub mod geometry;

/// HPGL tokenizer. Splits lines into commands and parses their parameters.
pub mod hpgl;

/// Object definition blocks (`PM0` ... `PM2`) and their classification
pub mod object;

/// Fill synthesis for circles and rectangles. Plotters can only draw lines,
/// so a fill is a set of strokes packed one pen width apart.
pub mod fill;

/// DXY output commands and the template based post-processor
pub mod dxy;

/// Pen state tracking plus the transport used to talk to a real plotter
pub mod plotter;

/// The command interpreter tying everything together
pub mod interpreter;

/// Import prelude::* to get the types needed for a conversion in one go.
pub mod prelude {
    pub use crate::config::ConvertConfig;
    pub use crate::dxy::{post, DxyCommand, DxyPostMachines};
    pub use crate::errors::ConvertError;
    pub use crate::geometry::{CoordinateTransform, Position};
    pub use crate::interpreter::{convert, Interpreter};
    pub use crate::object::{ObjectType, Shape};
}
