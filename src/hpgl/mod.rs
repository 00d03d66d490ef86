//! HPGL source side. A plot file is a sequence of lines, each holding
//! `;`-terminated commands made of a two letter opcode and comma separated
//! numbers, e.g. `PU;PA 8948,3855;PD;PA 8951,3858;`.
use geo_types::{coord, Coord};

use crate::errors::ConvertError;

/// Untransformed HPGL coordinate pair.
pub type RawPoint = Coord<f64>;

/// `PM` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonMode {
    /// `PM0`: start defining an object
    Begin,
    /// `PM2`: finish and classify the object
    End,
    /// `PM1`, bare `PM` and anything else we don't act on
    Other,
}

/// One parsed HPGL command.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `IN`
    Initialize,
    /// `SPn`, n in 0..=6. Zero asks the device for the current pen.
    SelectPen(u8),
    /// `PU`, optionally followed by points to move through
    PenUp(Vec<RawPoint>),
    /// `PD`, optionally followed by points to draw through
    PenDown(Vec<RawPoint>),
    /// `PM`
    PolygonMode(PolygonMode),
    /// `PA`
    PlotAbsolute(Vec<RawPoint>),
    /// `PR`
    PlotRelative(Vec<RawPoint>),
    /// `CI`, radius in plotter units
    Circle(f64),
    /// `EP`
    EdgePolygon,
    /// `FP`
    FillPolygon,
    /// Unknown opcodes and malformed `SP`. Dropped without a trace.
    Ignored,
}

/// Splits one input line into trimmed, non-empty commands.
pub fn split_commands(line: &str) -> impl Iterator<Item = &str> {
    line.split(';').map(str::trim).filter(|cmd| !cmd.is_empty())
}

/// Parses one trimmed command. `line` is only used for error reporting.
pub fn parse_command(line: usize, text: &str) -> Result<Instruction, ConvertError> {
    let (opcode, params) = match (text.get(..2), text.get(2..)) {
        (Some(opcode), Some(params)) => (opcode, params),
        _ => return Ok(Instruction::Ignored),
    };
    let instruction = match opcode {
        "IN" => Instruction::Initialize,
        "SP" => select_pen(text),
        // Only long enough forms carry coordinates, e.g. `PD1,2`.
        "PU" if text.len() > 4 => Instruction::PenUp(parse_points(line, text, params)?),
        "PU" => Instruction::PenUp(vec![]),
        "PD" if text.len() > 4 => Instruction::PenDown(parse_points(line, text, params)?),
        "PD" => Instruction::PenDown(vec![]),
        "PM" => Instruction::PolygonMode(match params.trim() {
            "0" => PolygonMode::Begin,
            "2" => PolygonMode::End,
            _ => PolygonMode::Other,
        }),
        "PA" => Instruction::PlotAbsolute(parse_points(line, text, params)?),
        "PR" => Instruction::PlotRelative(parse_points(line, text, params)?),
        "CI" => {
            // A chord tolerance may follow the radius; the plotter picks its own.
            let radius = params.split(',').next().unwrap_or("");
            Instruction::Circle(parse_number(line, text, radius)?)
        }
        "EP" => Instruction::EdgePolygon,
        "FP" => Instruction::FillPolygon,
        _ => Instruction::Ignored,
    };
    Ok(instruction)
}

fn select_pen(text: &str) -> Instruction {
    if text.len() != 3 {
        return Instruction::Ignored;
    }
    match text.as_bytes()[2] {
        digit @ b'0'..=b'6' => Instruction::SelectPen(digit - b'0'),
        _ => Instruction::Ignored,
    }
}

fn parse_number(line: usize, text: &str, field: &str) -> Result<f64, ConvertError> {
    let field = field.trim();
    if field.is_empty() {
        return Err(ConvertError::parse(line, text, "missing number"));
    }
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ConvertError::parse(
            line,
            text,
            format!("'{}' is not a number", field),
        )),
    }
}

fn parse_points(line: usize, text: &str, params: &str) -> Result<Vec<RawPoint>, ConvertError> {
    if params.trim().is_empty() {
        return Ok(vec![]);
    }
    let numbers = params
        .split(',')
        .map(|field| parse_number(line, text, field))
        .collect::<Result<Vec<f64>, ConvertError>>()?;
    if numbers.len() % 2 != 0 {
        return Err(ConvertError::parse(
            line,
            text,
            format!("{} coordinates do not form x,y pairs", numbers.len()),
        ));
    }
    Ok(numbers
        .chunks_exact(2)
        .map(|pair| coord! {x: pair[0], y: pair[1]})
        .collect())
}
