//! Deterministic manifest serialization
//!
//! Entries are sorted by `dest-filename` and rendered as a JSON array with
//! four-space indentation, then written to disk in one step.

use crate::error::{NugetError, NugetResult};
use crate::manifest::ManifestEntry;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use std::fs;
#[cfg(unix)]
use std::fs::Permissions;
use std::io::{self, Write};
use std::path::Path;
use tempfile::Builder;
use tracing::info;

const INDENT: &[u8] = b"    ";

/// Mode of a newly created manifest, before the umask
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o666;

/// Pretty formatter writing non-ASCII characters as `\uXXXX` escapes
struct AsciiFormatter(PrettyFormatter<'static>);

impl Formatter for AsciiFormatter {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut [0; 2]) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

/// Sort, de-duplicate and serialize entries
///
/// The sort is stable, so equal `dest-filename`s keep discovery order and
/// the first of them is kept. Output is pure ASCII: other characters are
/// written as lowercase `\uXXXX` escapes.
pub fn render(entries: Vec<ManifestEntry>) -> NugetResult<Vec<u8>> {
    to_json(&normalize(entries))
}

fn normalize(mut entries: Vec<ManifestEntry>) -> Vec<ManifestEntry> {
    entries.sort_by(|a, b| a.dest_filename.cmp(&b.dest_filename));
    entries.dedup_by(|a, b| a.dest_filename == b.dest_filename);
    entries
}

fn to_json(entries: &[ManifestEntry]) -> NugetResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = AsciiFormatter(PrettyFormatter::with_indent(INDENT));
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    entries.serialize(&mut ser)?;
    Ok(buf)
}

/// Write the manifest to `path`, replacing any existing file
///
/// The content is rendered in memory and moved into place from a
/// temporary file in the same directory, so `path` never holds a partial
/// manifest. An existing file keeps its permissions; a new one gets the
/// usual `0o666` minus umask. Returns the number of entries written.
pub fn write_manifest(entries: Vec<ManifestEntry>, path: &Path) -> NugetResult<usize> {
    let entries = normalize(entries);
    let content = to_json(&entries)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_err = |source| NugetError::ManifestWrite {
        path: path.to_path_buf(),
        source,
    };

    let existing = fs::metadata(path).ok().map(|m| m.permissions());
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(NEW_FILE_MODE));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(write_err)?;
    if let Some(permissions) = existing {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(write_err)?;
    }
    tmp.write_all(&content).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    info!("Wrote {} sources to {}", entries.len(), path.display());
    Ok(entries.len())
}
