//! hpgl2dxy - convert HPGL plot files for Roland DXY style plotters
//!
//! Usage:
//!   hpgl2dxy <name> [scale] [--config <file.ron>] [--no-header]
//!       Converts <name>.plt (or <name>.hpgl) into <name>.hita
//!   hpgl2dxy send <file> <uri> [--delay-us <n>]
//!       Streams a converted file to a plotter, e.g. file:///dev/lp0 or
//!       serial:///dev/ttyUSB0@9600

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use hpgl2dxy::plotter::{send_program, PlotterConnection, DEFAULT_BYTE_DELAY};
use hpgl2dxy::prelude::*;

const LINE_END: &str = "\r\n";

#[derive(Debug, Error)]
#[error("neither {0}.plt nor {0}.hpgl can be accessed")]
struct SourceNotFound(String);

fn print_usage(program: &str) {
    println!("Usage: {} <name> [scale] [--config <file.ron>] [--no-header]", program);
    println!("       {} send <file> <uri> [--delay-us <n>]", program);
    println!("Converts name.plt or name.hpgl into name.hita. Default scale is 1.0.");
    println!("send streams a .hita file to file:///dev/lp0 or serial:///dev/ttyUSB0@9600.");
}

/// `<name>.plt`, then `<name>.hpgl`, then `<name>` itself.
fn find_source(name: &str) -> Option<PathBuf> {
    [format!("{}.plt", name), format!("{}.hpgl", name)]
        .into_iter()
        .map(PathBuf::from)
        .chain(std::iter::once(PathBuf::from(name)))
        .find(|path| path.is_file())
}

fn output_path(name: &str, source: &Path) -> PathBuf {
    if source == Path::new(name) {
        source.with_extension("hita")
    } else {
        PathBuf::from(format!("{}.hita", name))
    }
}

fn header(source: &Path, target: &Path, program: &str) -> Vec<String> {
    let user = env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    vec![
        "# Hitachi 671-20 plot file converted from a .plt or .hpgl file.".to_string(),
        format!(
            "# In-file: {} - Out-file: {}",
            source.display(),
            target.display()
        ),
        format!(
            "# Date converted: {}",
            chrono::Local::now().format("%Y-%m-%d at %H:%M")
        ),
        format!("# Converted by: {} - with: {}", user, program),
        "# ------------------------------------------------------------".to_string(),
        "# ------------ Plot it with \"hpgl2dxy send\" ------------------".to_string(),
        "# ------------------------------------------------------------".to_string(),
    ]
}

fn cmd_convert(program: &str, args: &[String]) -> Result<()> {
    let mut name: Option<&str> = None;
    let mut scale: Option<f64> = None;
    let mut config_path: Option<&str> = None;
    let mut header_enabled = true;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                match args.get(i) {
                    Some(path) => config_path = Some(path.as_str()),
                    None => bail!("--config needs a file"),
                }
            }
            "--no-header" => header_enabled = false,
            arg if name.is_none() => name = Some(arg),
            arg if scale.is_none() => {
                scale = Some(
                    arg.parse()
                        .with_context(|| format!("scale '{}' is not a number", arg))?,
                )
            }
            arg => bail!("unexpected argument '{}'", arg),
        }
        i += 1;
    }
    let name = match name {
        Some(name) => name,
        None => bail!("missing file name"),
    };

    let mut config = match config_path {
        Some(path) => ConvertConfig::from_file(Path::new(path))
            .with_context(|| format!("cannot load config {}", path))?,
        None => ConvertConfig::default(),
    };
    if let Some(scale) = scale {
        config.scale = scale;
    }
    if !header_enabled {
        config.header = false;
    }
    config.validate()?;

    let source = find_source(name).ok_or_else(|| SourceNotFound(name.to_string()))?;
    let target = output_path(name, &source);
    println!("Converting {} to {} ... ", source.display(), target.display());

    let bytes = fs::read(&source).with_context(|| format!("cannot read {}", source.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let commands = convert(&text, &config)
        .with_context(|| format!("cannot convert {}", source.display()))?;
    let templates = DxyPostMachines::get_machine(DxyPostMachines::Hitachi671)?;

    let mut lines = if config.header {
        header(&source, &target, program)
    } else {
        vec![]
    };
    lines.extend(post(&commands, &templates)?);

    let mut out = lines.join(LINE_END);
    out.push_str(LINE_END);
    fs::write(&target, out).with_context(|| format!("cannot write {}", target.display()))?;
    println!("... done!");
    Ok(())
}

fn cmd_send(args: &[String]) -> Result<()> {
    let mut positional: Vec<&str> = vec![];
    let mut delay = DEFAULT_BYTE_DELAY;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--delay-us" => {
                i += 1;
                let micros: u64 = match args.get(i) {
                    Some(value) => value
                        .parse()
                        .with_context(|| format!("delay '{}' is not a number", value))?,
                    None => bail!("--delay-us needs a value"),
                };
                delay = Duration::from_micros(micros);
            }
            arg => positional.push(arg),
        }
        i += 1;
    }
    let (file, uri) = match positional.as_slice() {
        [file, uri] => (*file, *uri),
        _ => bail!("send needs a file and a plotter uri"),
    };

    let program = fs::read_to_string(file).with_context(|| format!("cannot read {}", file))?;
    let mut connection = PlotterConnection::from_uri(uri)
        .with_context(|| format!("cannot open plotter at {}", uri))?;
    println!("Plotting file: {}", file);
    let sent = send_program(&mut connection, &program, delay)?;
    println!("Done! {} lines sent.", sent);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("hpgl2dxy");
    let result = match args.get(1).map(String::as_str) {
        None | Some("-h") | Some("--help") => {
            print_usage(program);
            return ExitCode::from(1);
        }
        Some("send") => cmd_send(&args[2..]),
        Some(_) => cmd_convert(program, &args[1..]),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if err.downcast_ref::<SourceNotFound>().is_some() {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}
