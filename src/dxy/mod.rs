//! Module which turns [`DxyCommand`]s into plotter text
use std::fmt;

use tera::{Context, Tera};

use crate::errors::ConvertError;
use crate::geometry::Position;

/// One command in the target dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DxyCommand {
    /// `H`, home/reset the plotter
    Reset,
    /// `Jn`
    SelectPen(u8),
    /// `Mx,y`
    Move(Position),
    /// `Dx,y`
    Draw(Position),
    /// `Rdx,dy`
    RelativeMove(Position),
    /// `Idx,dy`
    RelativeDraw(Position),
    /// `Cx,y,r,a0,a1`, angles in degrees
    Circle {
        center: Position,
        radius: i64,
        start_angle: i64,
        end_angle: i64,
    },
}

impl DxyCommand {
    /// A full circle.
    pub fn circle(center: Position, radius: i64) -> Self {
        DxyCommand::Circle {
            center,
            radius,
            start_angle: 0,
            end_angle: 360,
        }
    }

    /// Name of the post-processor template rendering this command.
    pub fn template_name(&self) -> &'static str {
        match self {
            DxyCommand::Reset => "reset",
            DxyCommand::SelectPen(_) => "select_pen",
            DxyCommand::Move(_) => "move",
            DxyCommand::Draw(_) => "draw",
            DxyCommand::RelativeMove(_) => "relative_move",
            DxyCommand::RelativeDraw(_) => "relative_draw",
            DxyCommand::Circle { .. } => "circle",
        }
    }

    /// Template variables for this command.
    pub fn context(&self) -> Context {
        let mut context = Context::new();
        match self {
            DxyCommand::Reset => {}
            DxyCommand::SelectPen(pen) => context.insert("pen", pen),
            DxyCommand::Move(p)
            | DxyCommand::Draw(p)
            | DxyCommand::RelativeMove(p)
            | DxyCommand::RelativeDraw(p) => {
                context.insert("x", &p.x);
                context.insert("y", &p.y);
            }
            DxyCommand::Circle {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                context.insert("x", &center.x);
                context.insert("y", &center.y);
                context.insert("radius", radius);
                context.insert("start", start_angle);
                context.insert("end", end_angle);
            }
        }
        context
    }
}

impl fmt::Display for DxyCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DxyCommand::Reset => write!(f, "H"),
            DxyCommand::SelectPen(pen) => write!(f, "J{}", pen),
            DxyCommand::Move(p) => write!(f, "M{},{}", p.x, p.y),
            DxyCommand::Draw(p) => write!(f, "D{},{}", p.x, p.y),
            DxyCommand::RelativeMove(p) => write!(f, "R{},{}", p.x, p.y),
            DxyCommand::RelativeDraw(p) => write!(f, "I{},{}", p.x, p.y),
            DxyCommand::Circle {
                center,
                radius,
                start_angle,
                end_angle,
            } => write!(
                f,
                "C{},{},{},{},{}",
                center.x, center.y, radius, start_angle, end_angle
            ),
        }
    }
}

/// Roland DXY subset understood by the Hitachi 671-20.
const HITACHI_671_TEMPLATES: [(&str, &str); 7] = [
    ("reset", "H"),
    ("select_pen", "J{{pen}}"),
    ("move", "M{{x}},{{y}}"),
    ("draw", "D{{x}},{{y}}"),
    ("relative_move", "R{{x}},{{y}}"),
    ("relative_draw", "I{{x}},{{y}}"),
    ("circle", "C{{x}},{{y}},{{radius}},{{start}},{{end}}"),
];

/// List of all available machines as an Enum
pub enum DxyPostMachines {
    Hitachi671,
    /// Bring your own templates. Every template name from
    /// [`DxyCommand::template_name`] has to be present.
    CustomMachine(Tera),
}

impl DxyPostMachines {
    /// Getter for the machine templates used by [`post`].
    pub fn get_machine(machine: DxyPostMachines) -> Result<Tera, ConvertError> {
        match machine {
            DxyPostMachines::Hitachi671 => {
                let mut templates = Tera::default();
                templates.add_raw_templates(HITACHI_671_TEMPLATES.to_vec())?;
                Ok(templates)
            }
            DxyPostMachines::CustomMachine(templates) => Ok(templates),
        }
    }
}

/// Renders commands into program lines, one or more per command.
pub fn post(commands: &[DxyCommand], post_template: &Tera) -> Result<Vec<String>, ConvertError> {
    let mut program: Vec<String> = Vec::with_capacity(commands.len());
    for command in commands {
        program.extend(
            post_template
                .render(command.template_name(), &command.context())?
                .split('\n')
                .map(|s| s.to_string()),
        );
    }
    Ok(program)
}

#[cfg(test)]
mod test {
    use super::{post, DxyCommand, DxyPostMachines};
    use geo_types::coord;
    use tera::Tera;

    fn sample() -> Vec<DxyCommand> {
        vec![
            DxyCommand::Reset,
            DxyCommand::SelectPen(2),
            DxyCommand::Move(coord! {x: 987, y: 714}),
            DxyCommand::Draw(coord! {x: 988, y: -715}),
            DxyCommand::RelativeMove(coord! {x: -3, y: 4}),
            DxyCommand::RelativeDraw(coord! {x: 5, y: 0}),
            DxyCommand::circle(coord! {x: 9442, y: 4438}, 120),
        ]
    }

    #[test]
    fn test_post_hitachi() {
        let templates = DxyPostMachines::get_machine(DxyPostMachines::Hitachi671).unwrap();
        let program = post(&sample(), &templates).unwrap();
        assert_eq!(
            program,
            vec![
                "H",
                "J2",
                "M987,714",
                "D988,-715",
                "R-3,4",
                "I5,0",
                "C9442,4438,120,0,360"
            ]
        );
    }

    #[test]
    fn test_display_matches_templates() {
        let templates = DxyPostMachines::get_machine(DxyPostMachines::Hitachi671).unwrap();
        let program = post(&sample(), &templates).unwrap();
        let displayed: Vec<String> = sample().iter().map(|c| c.to_string()).collect();
        assert_eq!(program, displayed);
    }

    #[test]
    fn test_custom_machine() {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("move", "PU {{x}} {{y}}"),
            ("draw", "PD {{x}} {{y}}\nWAIT"),
        ])
        .unwrap();
        let templates = DxyPostMachines::get_machine(DxyPostMachines::CustomMachine(tera)).unwrap();
        let program = post(
            &[
                DxyCommand::Move(coord! {x: 1, y: 2}),
                DxyCommand::Draw(coord! {x: 3, y: 4}),
            ],
            &templates,
        )
        .unwrap();
        assert_eq!(program, vec!["PU 1 2", "PD 3 4", "WAIT"]);
        assert!(post(&[DxyCommand::Reset], &templates).is_err());
    }
}
