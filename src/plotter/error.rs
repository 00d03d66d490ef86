use std::io;
use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotterConnectionError {
    #[error("i/o error: {0}")]
    IOError(#[from] io::Error),
    #[error("device error: {0}")]
    DeviceError(String),
    #[error("cannot parse connection uri: {0}")]
    ParseError(String),
    #[error("unsupported connection scheme '{0}', use serial:// or file://")]
    UnsupportedScheme(String),
}

impl From<url::ParseError> for PlotterConnectionError {
    fn from(error: url::ParseError) -> Self {
        PlotterConnectionError::ParseError(error.to_string())
    }
}

impl From<ParseIntError> for PlotterConnectionError {
    fn from(error: ParseIntError) -> Self {
        PlotterConnectionError::ParseError(error.to_string())
    }
}

impl From<serialport::Error> for PlotterConnectionError {
    fn from(error: serialport::Error) -> Self {
        PlotterConnectionError::DeviceError(error.to_string())
    }
}
