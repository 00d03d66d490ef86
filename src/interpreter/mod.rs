//! Provides the [`Interpreter`], which walks an HPGL stream command by
//! command and collects the DXY commands it turns into.
use tracing::{debug, warn};

use crate::config::ConvertConfig;
use crate::dxy::DxyCommand;
use crate::errors::ConvertError;
use crate::fill::{fill_shape, Quad};
use crate::geometry::{CoordinateTransform, Position};
use crate::hpgl::{parse_command, split_commands, Instruction, PolygonMode, RawPoint};
use crate::object::{Capture, ObjectBuilder, Shape};
use crate::plotter::pen::PenState;

/// # Interpreter
///
/// Owns all conversion state: the pen, the object block being defined and
/// the output built so far. Feed it lines in order with
/// [`Interpreter::feed_line`] and collect the result with
/// [`Interpreter::finish`].
///
/// # Example
///
/// ```rust
/// use hpgl2dxy::prelude::*;
///
/// let mut interpreter = Interpreter::new(&ConvertConfig::default()).unwrap();
/// interpreter.feed_line("IN;SP1;PU;PA 4000,4000;").unwrap();
/// interpreter.feed_line("PM 0; CI 400; PM 2; EP;").unwrap();
/// let out: Vec<String> = interpreter.finish().iter().map(|c| c.to_string()).collect();
/// assert_eq!(out, vec!["H", "J1", "M1000,1000", "C1000,1000,100,0,360"]);
/// ```
#[derive(Debug, Clone)]
pub struct Interpreter {
    transform: CoordinateTransform,
    pen_width: f64,
    pen: PenState,
    objects: ObjectBuilder,
    /// Target of the last move, or the last center given inside a block.
    /// Stand-alone circles are drawn around it.
    anchor: Position,
    /// Last circle radius seen, in device units.
    radius: i64,
    line: usize,
    output: Vec<DxyCommand>,
}

impl Interpreter {
    pub fn new(config: &ConvertConfig) -> Result<Interpreter, ConvertError> {
        config.validate()?;
        Ok(Interpreter {
            transform: config.transform(),
            pen_width: config.pen_width,
            pen: PenState::new(),
            objects: ObjectBuilder::new(),
            anchor: Position::default(),
            radius: 0,
            line: 0,
            output: vec![],
        })
    }

    /// Processes one line of input, commands left to right.
    pub fn feed_line(&mut self, text: &str) -> Result<&mut Self, ConvertError> {
        self.line += 1;
        for command in split_commands(text) {
            let instruction = parse_command(self.line, command)?;
            if instruction == Instruction::Ignored {
                debug!("line {}: ignoring '{}'", self.line, command);
                continue;
            }
            self.execute(instruction)?;
        }
        Ok(self)
    }

    /// Applies a single parsed instruction.
    pub fn execute(&mut self, instruction: Instruction) -> Result<&mut Self, ConvertError> {
        match instruction {
            Instruction::Initialize => self.output.push(DxyCommand::Reset),
            Instruction::SelectPen(n) => {
                if let Some(command) = self.pen.select_pen(n) {
                    self.output.push(command);
                }
            }
            Instruction::PenUp(points) => {
                self.pen.set_pen_up();
                self.plot_absolute("PU", &points)?;
            }
            Instruction::PenDown(points) => {
                self.pen.set_pen_down();
                self.plot_absolute("PD", &points)?;
            }
            Instruction::PolygonMode(mode) => self.polygon_mode(mode)?,
            Instruction::PlotAbsolute(points) => self.plot_absolute("PA", &points)?,
            Instruction::PlotRelative(points) => {
                for delta in points {
                    let command = self
                        .transform
                        .apply_delta(delta.x, delta.y)
                        .and_then(|delta| self.pen.advance_by(delta))
                        .ok_or_else(|| self.out_of_range("PR"))?;
                    self.output.push(command);
                }
            }
            Instruction::Circle(raw) => {
                self.radius = self
                    .transform
                    .apply_length(raw)
                    .ok_or_else(|| self.out_of_range("CI"))?;
                if !self.objects.set_radius(self.radius) {
                    self.output
                        .push(DxyCommand::circle(self.anchor, self.radius));
                }
            }
            Instruction::EdgePolygon => self.extend(),
            Instruction::FillPolygon => self.fill()?,
            Instruction::Ignored => {}
        }
        Ok(self)
    }

    /// Output produced so far.
    pub fn commands(&self) -> &[DxyCommand] {
        &self.output
    }

    pub fn pen(&self) -> &PenState {
        &self.pen
    }

    /// The last object defined, for `EP`/`FP`.
    pub fn shape(&self) -> &Shape {
        self.objects.shape()
    }

    /// Number of lines fed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn finish(self) -> Vec<DxyCommand> {
        if self.objects.is_open() {
            warn!("input ended inside an object block");
        }
        self.output
    }

    fn plot_absolute(&mut self, opcode: &str, points: &[RawPoint]) -> Result<(), ConvertError> {
        for point in points {
            let position = self
                .transform
                .apply(point.x, point.y)
                .ok_or_else(|| self.out_of_range(opcode))?;
            match self.objects.capture(position, self.pen.is_down()) {
                Some(Capture::Center(center)) => self.anchor = center,
                Some(Capture::Vertex(_)) => {}
                None => {
                    let command = self.pen.advance_to(position);
                    if let DxyCommand::Move(target) = command {
                        self.anchor = target;
                    }
                    self.output.push(command);
                }
            }
        }
        Ok(())
    }

    fn out_of_range(&self, opcode: &str) -> ConvertError {
        ConvertError::parse(self.line, opcode, "coordinate out of range")
    }

    fn polygon_mode(&mut self, mode: PolygonMode) -> Result<(), ConvertError> {
        match mode {
            PolygonMode::Begin => self.objects.open(self.anchor, self.radius),
            PolygonMode::End => {
                if self.objects.close(self.line)?.is_none() {
                    warn!("line {}: PM 2 without an open object block", self.line);
                }
            }
            PolygonMode::Other => debug!("line {}: ignoring polygon mode", self.line),
        }
        Ok(())
    }

    /// Outline of the last object.
    fn extend(&mut self) {
        match self.objects.shape() {
            Shape::None => warn!("line {}: EP without an object", self.line),
            Shape::Circle { center, radius } => {
                self.output.push(DxyCommand::circle(*center, *radius));
            }
            shape => {
                let vertices = shape.vertices();
                if let Some(last) = vertices.last() {
                    self.output.push(DxyCommand::Move(*last));
                }
                self.output
                    .extend(vertices.iter().map(|v| DxyCommand::Draw(*v)));
            }
        }
    }

    /// Fill strokes for the last object.
    fn fill(&mut self) -> Result<(), ConvertError> {
        let shape = self.objects.shape();
        if *shape == Shape::None {
            return Err(ConvertError::NoObject { line: self.line });
        }
        let strokes = fill_shape(shape, self.pen_width);
        self.output.extend(strokes);
        // Same corners, but an outline after a fill starts from the left one.
        if let Shape::Square(corners) = self.objects.shape_mut() {
            *corners = Quad::from_positions(corners).positions();
        }
        Ok(())
    }
}

/// Converts a whole HPGL document.
pub fn convert(source: &str, config: &ConvertConfig) -> Result<Vec<DxyCommand>, ConvertError> {
    let mut interpreter = Interpreter::new(config)?;
    for line in source.lines() {
        interpreter.feed_line(line)?;
    }
    Ok(interpreter.finish())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::object::ObjectType;
    use geo_types::coord;

    fn unit_config() -> ConvertConfig {
        ConvertConfig {
            x_div: 1.0,
            y_div: 1.0,
            ..ConvertConfig::default()
        }
    }

    fn lines(source: &str, config: &ConvertConfig) -> Vec<String> {
        convert(source, config)
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn test_move_then_draw() {
        assert_eq!(
            lines("PU;PA100,100;PD;PA200,100;PA200,200;", &unit_config()),
            vec!["M100,100", "D200,100", "D200,200"]
        );
    }

    #[test]
    fn test_reset_and_pens() {
        assert_eq!(
            lines("IN;SP1;SP 2;SP9;SP0;XX;", &unit_config()),
            vec!["H", "J1", "J0"]
        );
    }

    #[test]
    fn test_pen_commands_with_coordinates() {
        assert_eq!(
            lines("PU10,10;PD20,10,20,20;PU;PA 5,5;", &unit_config()),
            vec!["M10,10", "D20,10", "D20,20", "M5,5"]
        );
    }

    #[test]
    fn test_relative_plot() {
        let config = ConvertConfig {
            x_offset: 100.0,
            ..ConvertConfig::default()
        };
        assert_eq!(
            lines("PU;PR 40,-40;PD;PR 8,8;", &config),
            vec!["R10,-10", "I2,2"]
        );
    }

    #[test]
    fn test_standalone_circle_uses_last_move() {
        assert_eq!(
            lines("PU;PA 10,10;PD;PA 20,20;CI 5;", &unit_config()),
            vec!["M10,10", "D20,20", "C10,10,5,0,360"]
        );
    }

    #[test]
    fn test_circle_object_extend_and_fill() {
        let config = ConvertConfig {
            pen_width: 5.0,
            ..unit_config()
        };
        assert_eq!(
            lines("PM0;PA50,50;CI30;PM2;EP;FP;", &config),
            vec![
                "C50,50,30,0,360",
                "C50,50,25,0,360",
                "C50,50,20,0,360",
                "C50,50,15,0,360",
                "C50,50,10,0,360",
                "C50,50,5,0,360",
            ]
        );
    }

    #[test]
    fn test_square_object_extend() {
        let mut interpreter = Interpreter::new(&unit_config()).unwrap();
        interpreter
            .feed_line("PM0;PD;PA0,0;PA100,0;PA100,100;PA0,100;PM2;EP;")
            .unwrap();
        assert_eq!(interpreter.shape().kind(), ObjectType::Square);
        let out: Vec<String> = interpreter.commands().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            out,
            vec!["M0,100", "D0,0", "D100,0", "D100,100", "D0,100"]
        );
    }

    #[test]
    fn test_extend_after_fill_keeps_corners() {
        let config = ConvertConfig {
            pen_width: 10.0,
            ..unit_config()
        };
        let source = "PM0;PD;PA0,0;PA100,0;PA100,100;PA0,100;PM2;FP;EP;";
        let out = lines(source, &config);
        // Same outline, walked left, top, right, bottom like the fill.
        let outline = &out[out.len() - 5..];
        assert_eq!(outline, &["M0,100", "D100,100", "D100,0", "D0,0", "D0,100"]);
        assert_eq!(out[0], "M0,100");
        assert_eq!(out.len(), 1 + 4 * 5 + 5);
    }

    #[test]
    fn test_new_block_forgets_previous_shape() {
        assert!(matches!(
            convert("PM0;PA50,50;CI30;PM2;
PM0;FP;", &unit_config()),
            Err(ConvertError::NoObject { line: 2 })
        ));
        assert!(lines("PM0;PA50,50;CI30;PM2;PM0;EP;", &unit_config()).is_empty());
    }

    #[test]
    fn test_block_center_becomes_anchor() {
        assert_eq!(
            lines("PU;PA0,0;PM0;PA100,100;CI10;PM2;EP;CI5;", &unit_config()),
            vec!["M0,0", "C100,100,10,0,360", "C100,100,5,0,360"]
        );
    }

    #[test]
    fn test_huge_coordinates_are_rejected() {
        assert!(matches!(
            convert("PU;PA 1e30,0;", &unit_config()),
            Err(ConvertError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            convert("PU;PR 5e18,0;
PR 5e18,0;", &unit_config()),
            Err(ConvertError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            convert("PM0;CI 1e30;", &unit_config()),
            Err(ConvertError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_block_positions_are_not_plotted() {
        let mut interpreter = Interpreter::new(&unit_config()).unwrap();
        interpreter.feed_line("PU;PA 1,1;PM0;PD;PA 5,5,6,6;").unwrap();
        assert_eq!(interpreter.commands(), &[DxyCommand::Move(coord! {x: 1, y: 1})]);
        assert_eq!(interpreter.pen().position(), coord! {x: 1, y: 1});
        interpreter.feed_line("PM2;").unwrap();
        assert_eq!(interpreter.shape().kind(), ObjectType::Polyline);
    }

    #[test]
    fn test_triangle_fill_is_silent() {
        let out = lines("PM0;PD;PA0,0,50,0,25,40;PM2;FP;", &unit_config());
        assert!(out.is_empty());
    }

    #[test]
    fn test_malformed_object_reports_line() {
        let source = "PU;PA0,0;\nPM0;PD;PA1,1;\nPM2;";
        match convert(source, &unit_config()) {
            Err(ConvertError::MalformedObject { line, vertices }) => {
                assert_eq!(line, 3);
                assert_eq!(vertices, 1);
            }
            other => panic!("expected MalformedObject, got {:?}", other),
        }
    }

    #[test]
    fn test_fill_without_object_is_fatal() {
        assert!(matches!(
            convert("PU;\nFP;", &unit_config()),
            Err(ConvertError::NoObject { line: 2 })
        ));
    }

    #[test]
    fn test_extend_without_object_is_silent() {
        assert!(lines("EP;", &unit_config()).is_empty());
    }

    #[test]
    fn test_parse_error_stops_conversion() {
        assert!(matches!(
            convert("PU;PA 1,1;\nPA 2,two;", &unit_config()),
            Err(ConvertError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ConvertConfig {
            y_div: 0.0,
            ..ConvertConfig::default()
        };
        assert!(matches!(
            Interpreter::new(&config),
            Err(ConvertError::Config(_))
        ));
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let source = "IN;SP1;PU;PA 8948,3855;PD;PA 8951,3858,8956,3861;\n\
                      PU;PA 6535,4438;PM 0; PA 6597,4438;CI 62;PM 2; FP; EP;\n\
                      PM 0;PD;PA 6514,3777;PA 6578,3777;PA 6578,3523;PA 6514,3523;PM 2; FP; EP;";
        let config = ConvertConfig::default();
        assert_eq!(lines(source, &config), lines(source, &config));
    }
}
