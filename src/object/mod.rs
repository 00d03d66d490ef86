use tracing::debug;

use crate::errors::ConvertError;
use crate::geometry::Position;

/// Classification of a closed object block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    None,
    Circle,
    Polyline,
    Triangle,
    Square,
}

/// The last object defined with `PM0` ... `PM2`.
///
/// Vertices keep definition order. Triangles and polylines are classified
/// but nothing fills them yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    None,
    Circle { center: Position, radius: i64 },
    Polyline([Position; 2]),
    Triangle([Position; 3]),
    Square([Position; 4]),
}

impl Shape {
    pub fn kind(&self) -> ObjectType {
        match self {
            Shape::None => ObjectType::None,
            Shape::Circle { .. } => ObjectType::Circle,
            Shape::Polyline(_) => ObjectType::Polyline,
            Shape::Triangle(_) => ObjectType::Triangle,
            Shape::Square(_) => ObjectType::Square,
        }
    }

    /// Corner points in definition order. Empty for circles.
    pub fn vertices(&self) -> &[Position] {
        match self {
            Shape::None | Shape::Circle { .. } => &[],
            Shape::Polyline(v) => v,
            Shape::Triangle(v) => v,
            Shape::Square(v) => v,
        }
    }
}

/// What a position inside an open block was taken as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Pen up: the circle center.
    Center(Position),
    /// Pen down: corner number `n`, counting from zero.
    Vertex(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ObjectInProgress {
    vertices: Vec<Position>,
    center: Position,
    radius: i64,
}

/// Collects the geometry of an object block and classifies it on close.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectBuilder {
    open: Option<ObjectInProgress>,
    shape: Shape,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// The most recently classified object.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    /// Starts a new block. The circle center and radius are seeded with the
    /// current pen anchor and the last radius seen, so `PM0;CI r;PM2` works
    /// around wherever the pen last moved to. Opening twice starts over.
    /// The previous shape is forgotten.
    pub fn open(&mut self, anchor: Position, radius: i64) {
        debug!("object block opened at {:?}", anchor);
        self.shape = Shape::None;
        self.open = Some(ObjectInProgress {
            vertices: Vec::with_capacity(4),
            center: anchor,
            radius,
        });
    }

    /// Records a position. Returns `None` when no block is open.
    pub fn capture(&mut self, position: Position, pen_down: bool) -> Option<Capture> {
        let object = self.open.as_mut()?;
        if pen_down {
            object.vertices.push(position);
            Some(Capture::Vertex(object.vertices.len() - 1))
        } else {
            object.center = position;
            Some(Capture::Center(position))
        }
    }

    /// Records a circle radius. Returns false when no block is open.
    pub fn set_radius(&mut self, radius: i64) -> bool {
        match self.open.as_mut() {
            Some(object) => {
                object.radius = radius;
                true
            }
            None => false,
        }
    }

    /// Ends the block and classifies it by vertex count. Returns `Ok(None)`
    /// when no block was open, leaving the previous shape in place.
    pub fn close(&mut self, line: usize) -> Result<Option<ObjectType>, ConvertError> {
        let object = match self.open.take() {
            Some(object) => object,
            None => return Ok(None),
        };
        let v = &object.vertices;
        self.shape = match v.len() {
            0 => Shape::Circle {
                center: object.center,
                radius: object.radius,
            },
            2 => Shape::Polyline([v[0], v[1]]),
            3 => Shape::Triangle([v[0], v[1], v[2]]),
            4 => Shape::Square([v[0], v[1], v[2], v[3]]),
            vertices => return Err(ConvertError::MalformedObject { line, vertices }),
        };
        debug!("object block closed as {:?}", self.shape.kind());
        Ok(Some(self.shape.kind()))
    }
}
