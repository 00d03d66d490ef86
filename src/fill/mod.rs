use tracing::debug;

use crate::dxy::DxyCommand;
use crate::object::Shape;

/// Concentric circles, one pen width apart
pub mod circle;

/// Shrinking rectangle outlines
pub mod square;

pub use circle::fill_circle;
pub use square::{fill_square, Quad};

/// Strokes that fill `shape` with a pen `pen_width` wide.
///
/// Triangles and polylines are recognized but not filled; they and
/// [`Shape::None`] produce nothing.
pub fn fill_shape(shape: &Shape, pen_width: f64) -> Vec<DxyCommand> {
    match shape {
        Shape::Circle { center, radius } => fill_circle(*center, *radius, pen_width),
        Shape::Square(corners) => fill_square(corners, pen_width),
        Shape::Triangle(_) => {
            debug!("triangle fill is not implemented, skipping");
            vec![]
        }
        Shape::Polyline(_) => {
            debug!("polyline fill is not implemented, skipping");
            vec![]
        }
        Shape::None => vec![],
    }
}
