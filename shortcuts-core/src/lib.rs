mod config;
pub mod error;
pub mod model;
mod service;

use std::io::{Read, Write};
use std::str::FromStr;

pub use error::{Error, Result};
pub use model::Shortcut;
pub use service::grouping::{GroupIdSource, UuidSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Plist,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "toml" => Ok(Format::Toml),
            "plist" => Ok(Format::Plist),
            other => Err(Error::UnknownFormat(other.to_owned())),
        }
    }
}

pub fn load<R: Read>(reader: &mut R, format: Format) -> Result<Shortcut> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    loads(&source, format)
}

pub fn loads(source: &str, format: Format) -> Result<Shortcut> {
    loads_with(source, format, &mut UuidSource)
}

/// Same as [`loads`], with a caller-supplied source of grouping identifiers
/// for control-flow blocks.
pub fn loads_with(
    source: &str,
    format: Format,
    ids: &mut dyn GroupIdSource,
) -> Result<Shortcut> {
    log::debug!("loading shortcut from {format:?}");
    match format {
        Format::Toml => service::toml_loader::loads(source, ids),
        Format::Plist => service::plist_loader::loads(source),
    }
}

pub fn dump<W: Write>(shortcut: &Shortcut, writer: &mut W, format: Format) -> Result<()> {
    writer.write_all(dumps(shortcut, format)?.as_bytes())?;
    Ok(())
}

pub fn dumps(shortcut: &Shortcut, format: Format) -> Result<String> {
    log::debug!("dumping shortcut to {format:?}");
    match format {
        Format::Toml => service::toml_writer::dumps(shortcut),
        Format::Plist => service::plist_dumper::dumps(shortcut),
    }
}
