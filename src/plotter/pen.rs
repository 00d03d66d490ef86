use crate::dxy::DxyCommand;
use crate::geometry::Position;
use geo_types::coord;

/// Highest pen number the DXY dialect accepts in `J`.
pub const MAX_PEN: u8 = 6;

/// What the virtual pen is doing right now.
///
/// Decides whether a position becomes a move or a draw, and remembers where
/// the pen is and which pen was last selected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PenState {
    position: Position,
    down: bool,
    pen: Option<u8>,
}

impl PenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pen_up(&mut self) {
        self.down = false;
    }

    pub fn set_pen_down(&mut self) {
        self.down = true;
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Last selected pen, if any. Zero means "report the current pen".
    pub fn pen(&self) -> Option<u8> {
        self.pen
    }

    /// Selects pen `n`. Anything above [`MAX_PEN`] is dropped without
    /// touching the state.
    pub fn select_pen(&mut self, n: u8) -> Option<DxyCommand> {
        if n > MAX_PEN {
            return None;
        }
        self.pen = Some(n);
        Some(DxyCommand::SelectPen(n))
    }

    /// Absolute move or draw to `position`, depending on the pen.
    pub fn advance_to(&mut self, position: Position) -> DxyCommand {
        self.position = position;
        if self.down {
            DxyCommand::Draw(position)
        } else {
            DxyCommand::Move(position)
        }
    }

    /// Relative move or draw by `delta`. `None`, with the pen left where it
    /// was, if the new position would overflow.
    pub fn advance_by(&mut self, delta: Position) -> Option<DxyCommand> {
        self.position = coord! {
            x: self.position.x.checked_add(delta.x)?,
            y: self.position.y.checked_add(delta.y)?
        };
        Some(if self.down {
            DxyCommand::RelativeDraw(delta)
        } else {
            DxyCommand::RelativeMove(delta)
        })
    }
}
