use std::fs::OpenOptions;
use std::io::Write;
use std::io::{BufRead, BufReader, BufWriter};
use std::ops::DerefMut;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

/// Virtual pen state used while interpreting
pub mod pen;

pub mod error;
pub use error::*;

const DEFAULT_TIMEOUT: u64 = 30000;

/// Pause after every byte sent. Old plotters drop characters without it.
pub const DEFAULT_BYTE_DELAY: Duration = Duration::from_micros(100);

pub trait PlotterTransport {
    fn write_line(&mut self, buf: &str) -> std::io::Result<()>;
    fn write_raw(&mut self, buf: &[u8]) -> std::io::Result<()>;
    fn read_line(&mut self, buf: &mut String) -> std::io::Result<usize>;
    fn flush(&mut self) -> std::io::Result<()>;
}

pub enum PlotterConnection {
    SerialReadWrite(Box<dyn BufRead>, Box<dyn Write>),
    /// Write-only character device, e.g. a parallel port at /dev/lp0.
    Device(Box<dyn Write>),
}

impl PlotterConnection {
    /// Opens a connection from a URI:
    ///
    /// * `serial:///dev/ttyUSB0@9600` opens the serial port at 9600 bps.
    /// * `file:///dev/lp0` opens a device (or plain file) for writing.
    pub fn from_uri(uri: &str) -> Result<PlotterConnection, PlotterConnectionError> {
        let url = url::Url::parse(uri)?;
        match url.scheme() {
            "serial" => {
                let parts: Vec<&str> = url.path().split('@').collect();
                if parts.len() != 2 {
                    return Err(PlotterConnectionError::ParseError(format!(
                        "expected serial:///path@baud, got {}",
                        uri
                    )));
                }
                let path = parts[0].to_string();
                let bps = parts[1].parse::<u32>()?;
                let sp = serialport::new(path, bps)
                    .timeout(Duration::from_millis(DEFAULT_TIMEOUT))
                    .open()?;
                let reader = BufReader::new(sp.try_clone()?);
                let writer = BufWriter::new(sp);
                Ok(PlotterConnection::SerialReadWrite(
                    Box::new(reader),
                    Box::new(writer),
                ))
            }
            "file" => {
                let device = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(url.path())?;
                Ok(PlotterConnection::Device(Box::new(device)))
            }
            other => Err(PlotterConnectionError::UnsupportedScheme(other.to_string())),
        }
    }
}

impl PlotterTransport for PlotterConnection {
    fn write_line(&mut self, buf: &str) -> std::io::Result<()> {
        self.write_raw((buf.to_owned() + "\r\n").as_bytes())
    }

    fn write_raw(&mut self, buf: &[u8]) -> std::io::Result<()> {
        match self {
            PlotterConnection::SerialReadWrite(_, ref mut bwrite) => {
                bwrite.deref_mut().write_all(buf)
            }
            PlotterConnection::Device(ref mut device) => device.deref_mut().write_all(buf),
        }
    }

    fn read_line(&mut self, buf: &mut String) -> std::io::Result<usize> {
        match self {
            PlotterConnection::SerialReadWrite(ref mut bread, _) => {
                bread.deref_mut().read_line(buf)
            }
            PlotterConnection::Device(_) => Ok(0),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            PlotterConnection::SerialReadWrite(_, ref mut bwrite) => bwrite.deref_mut().flush(),
            PlotterConnection::Device(ref mut device) => device.deref_mut().flush(),
        }
    }
}

/// Streams a converted program to the plotter one byte at a time, pausing
/// `byte_delay` after each. Lines starting with `#` are comments and are
/// not sent. Returns the number of lines sent.
pub fn send_program<T: PlotterTransport>(
    transport: &mut T,
    program: &str,
    byte_delay: Duration,
) -> Result<usize, PlotterConnectionError> {
    let total = program.len().max(1);
    let mut consumed = 0usize;
    let mut sent = 0usize;
    for line in program.lines() {
        consumed += line.len() + 1;
        let line = line.trim_end_matches('\r');
        if line.starts_with('#') || line.is_empty() {
            continue;
        }
        for byte in line.bytes().chain("\r\n".bytes()) {
            transport.write_raw(&[byte])?;
            transport.flush()?;
            if !byte_delay.is_zero() {
                thread::sleep(byte_delay);
            }
        }
        sent += 1;
        debug!("sent '{}' ({}%)", line, consumed.min(total) * 100 / total);
    }
    info!("sent {} lines to the plotter", sent);
    Ok(sent)
}
