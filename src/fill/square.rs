//! Rectangle fill by repeatedly walking the outline one pen width further in.
//!
//! ```text
//!   left(3) ---------- top(0)
//!   |                      |
//!   |                      |
//!   bottom(2) -------- right(1)
//! ```
//!
//! The inward step moves each corner by one pen width and uses the slope of
//! the neighbouring edge to share the shift between the axes. That is only
//! right for axis aligned rectangles and ones turned by about 45 degrees;
//! other rotations drift a little per step. It is not a general polygon
//! offset.
use std::cmp::Ordering;

use geo_types::{coord, Coord};
use tracing::{debug, warn};

use crate::dxy::DxyCommand;
use crate::geometry::{round_device, Position};

/// Four corners in canonical order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    corners: [Coord<f64>; 4],
}

impl Quad {
    pub const TOP: usize = 0;
    pub const RIGHT: usize = 1;
    pub const BOTTOM: usize = 2;
    pub const LEFT: usize = 3;

    /// Sorts four points into canonical order, whatever order they came in:
    /// left is the smallest x (larger y wins a tie), bottom the smallest y
    /// (smaller x wins), right the largest x (smaller y wins) and top the
    /// largest y (larger x wins).
    pub fn canonical(points: &[Coord<f64>; 4]) -> Quad {
        let left = pick(points, |a, b| a.x.total_cmp(&b.x).then(b.y.total_cmp(&a.y)));
        let bottom = pick(points, |a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
        let right = pick(points, |a, b| b.x.total_cmp(&a.x).then(a.y.total_cmp(&b.y)));
        let top = pick(points, |a, b| b.y.total_cmp(&a.y).then(b.x.total_cmp(&a.x)));
        Quad {
            corners: [top, right, bottom, left],
        }
    }

    pub fn from_positions(positions: &[Position; 4]) -> Quad {
        Quad::canonical(&positions.map(|p| coord! {x: p.x as f64, y: p.y as f64}))
    }

    pub fn corners(&self) -> [Coord<f64>; 4] {
        self.corners
    }

    /// Corners back in device units, canonical order.
    pub fn positions(&self) -> [Position; 4] {
        self.corners.map(to_position)
    }

    pub fn top(&self) -> Coord<f64> {
        self.corners[Quad::TOP]
    }

    pub fn right(&self) -> Coord<f64> {
        self.corners[Quad::RIGHT]
    }

    pub fn bottom(&self) -> Coord<f64> {
        self.corners[Quad::BOTTOM]
    }

    pub fn left(&self) -> Coord<f64> {
        self.corners[Quad::LEFT]
    }

    /// Distances that must all stay above two pen widths for another pass:
    /// top-left and right-bottom in x, left-bottom and top-right in y.
    pub fn gaps(&self) -> [f64; 4] {
        [
            self.top().x - self.left().x,
            self.right().x - self.bottom().x,
            self.left().y - self.bottom().y,
            self.top().y - self.right().y,
        ]
    }

    pub fn has_room(&self, pen_width: f64) -> bool {
        self.gaps().iter().all(|gap| *gap > 2.0 * pen_width)
    }

    /// Moves every corner roughly one pen width inwards. Corners are updated
    /// in place one after another (left, top, right, bottom), and each slope
    /// is measured against the neighbour as it stands at that moment.
    pub fn step_inward(&mut self, pen_width: f64) {
        let w = pen_width;
        let [top, right, bottom, left] = &mut self.corners;

        left.x += w;
        left.y -= w - w * tan_from_x(*left, *top);

        top.x -= w - w * tan_from_y(*top, *right);
        top.y -= w;

        right.x -= w;
        right.y += w - w * tan_from_x(*right, *bottom);

        bottom.x += w - w * tan_from_y(*bottom, *left);
        bottom.y += w;
    }

    /// One closed loop around the current corners, starting and ending left.
    fn outline(&self) -> [DxyCommand; 5] {
        [
            DxyCommand::Draw(to_position(self.left())),
            DxyCommand::Draw(to_position(self.top())),
            DxyCommand::Draw(to_position(self.right())),
            DxyCommand::Draw(to_position(self.bottom())),
            DxyCommand::Draw(to_position(self.left())),
        ]
    }
}

/// First point that sorts lowest under `order`.
fn pick(points: &[Coord<f64>; 4], order: impl Fn(&Coord<f64>, &Coord<f64>) -> Ordering) -> Coord<f64> {
    points[1..].iter().fold(points[0], |best, p| {
        if order(p, &best).is_lt() {
            *p
        } else {
            best
        }
    })
}

fn to_position(c: Coord<f64>) -> Position {
    coord! {x: round_device(c.x), y: round_device(c.y)}
}

/// Tangent of the edge's angle against the x axis.
fn tan_from_x(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let (vx, vy) = ((b.x - a.x).abs(), (b.y - a.y).abs());
    let c = vx.hypot(vy);
    if c == 0.0 {
        return 0.0;
    }
    (vx / c).min(1.0).acos().tan()
}

/// Tangent of the edge's angle against the y axis.
fn tan_from_y(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let (vx, vy) = ((b.x - a.x).abs(), (b.y - a.y).abs());
    let c = vx.hypot(vy);
    if c == 0.0 {
        return 0.0;
    }
    (vy / c).min(1.0).acos().tan()
}

/// Fills a four cornered object. `corners` may be in any order and are not
/// modified; the fill works on its own canonical copy.
///
/// Emits a move to the left corner, then one closed outline per inward
/// step until any gap is down to two pen widths.
pub fn fill_square(corners: &[Position; 4], pen_width: f64) -> Vec<DxyCommand> {
    let mut quad = Quad::from_positions(corners);
    let mut strokes = vec![DxyCommand::Move(to_position(quad.left()))];

    // Steep edges can push corners outwards instead of in.
    let widest = quad.gaps().iter().cloned().fold(0.0f64, f64::max);
    let max_passes = (widest / pen_width).ceil() as usize;

    let mut passes = 0usize;
    while quad.has_room(pen_width) {
        if passes == max_passes {
            warn!("square fill stopped after {} passes without closing in", passes);
            break;
        }
        quad.step_inward(pen_width);
        strokes.extend(quad.outline());
        passes += 1;
    }
    debug!("square fill used {} passes", passes);
    strokes
}
