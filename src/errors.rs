use thiserror::Error;

/// Everything that can stop a conversion. All of these are fatal: the
/// conversion is a one-shot batch and nothing is retried.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// An object block closed with a vertex count the builder can't classify.
    #[error("malformed object: {vertices} vertices after PM 2 in line {line}")]
    MalformedObject { line: usize, vertices: usize },

    /// `FP` was seen while there is no classified object.
    #[error("fill requested in line {line} but no object has been defined")]
    NoObject { line: usize },

    /// A numeric parameter could not be used.
    #[error("line {line}: cannot parse '{command}': {reason}")]
    Parse {
        line: usize,
        command: String,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

impl ConvertError {
    pub(crate) fn parse(line: usize, command: &str, reason: impl Into<String>) -> Self {
        ConvertError::Parse {
            line,
            command: command.to_string(),
            reason: reason.into(),
        }
    }
}
