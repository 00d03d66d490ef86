use tracing::debug;

use crate::dxy::DxyCommand;
use crate::geometry::{round_device, Position};

/// Fills a circle with concentric circles, starting one pen width inside
/// the outline and stepping inwards until the radius left is no more than
/// one pen width. A circle no wider than the pen gets no strokes at all.
pub fn fill_circle(center: Position, radius: i64, pen_width: f64) -> Vec<DxyCommand> {
    let mut strokes = vec![];
    let mut remaining = radius as f64;
    while remaining > pen_width {
        remaining -= pen_width;
        strokes.push(DxyCommand::circle(center, round_device(remaining)));
    }
    debug!("circle fill r={} used {} strokes", radius, strokes.len());
    strokes
}
