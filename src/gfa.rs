use crate::buffer::ByteStream;
use crate::builder::RecordBuilder;
use crate::error::{FnaError, Result};
use crate::format::FormatKind;
use crate::parser::{FormatDriver, Settings};
use crate::record::{Orientation, Record};
use crate::table::{GFA_FIELD, GFA_SEQ, LINE};
use crate::token::{read_ascii, read_sequence, skip, Delim};
use log::{debug, trace};
use std::io::Read;

/// Oldest accepted header version, 1.0.0.
pub const MIN_VERSION: u32 = 0x10000;

const VERSION_TAG: &[u8] = b"VN:Z:";

/// Parses `major[.minor[.patch]]` into `major*0x10000 + minor*0x100 + patch`.
pub fn parse_version(text: &[u8]) -> Option<u32> {
    let text = std::str::from_utf8(text).ok()?;
    let mut parts = [0u32; 3];
    let mut count = 0;
    for part in text.split('.') {
        if count == parts.len() || part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        parts[count] = part.parse().ok()?;
        count += 1;
    }
    parts[0]
        .checked_mul(0x10000)?
        .checked_add(parts[1].checked_mul(0x100)?)?
        .checked_add(parts[2])
}

fn broken(msg: impl Into<String>) -> FnaError {
    FnaError::broken(FormatKind::Gfa, msg)
}

fn expect_tab<R: Read>(stream: &mut ByteStream<R>, after: &str) -> Result<()> {
    match stream.getc()? {
        Some(b'\t') => Ok(()),
        _ => Err(broken(format!("missing tab after {}", after))),
    }
}

/// Reads a field that must be followed by another one.
fn read_field<R: Read>(stream: &mut ByteStream<R>, out: &mut Vec<u8>, what: &str) -> Result<()> {
    match read_ascii(stream, &GFA_FIELD, out)? {
        Delim::Byte(b'\t') => Ok(()),
        _ => Err(broken(format!("line ends after {}", what))),
    }
}

fn read_orientation<R: Read>(stream: &mut ByteStream<R>) -> Result<Orientation> {
    let b = stream.getc()?;
    let orientation = b
        .and_then(Orientation::from_byte)
        .ok_or_else(|| broken("orientation must be '+' or '-'"))?;
    expect_tab(stream, "orientation")?;
    Ok(orientation)
}

/// Skips the optional tag fields when the last field ended on a tab.
fn finish_line<R: Read>(stream: &mut ByteStream<R>, delim: Delim) -> Result<()> {
    if delim == Delim::Byte(b'\t') {
        skip(stream, &LINE)?;
    }
    Ok(())
}

/// Segment (`S`) and link (`L`) lines of GFA 1.
#[derive(Debug, Clone, Default)]
pub struct GfaDriver {
    version: Option<u32>,
}

impl GfaDriver {
    /// Version from the `H` line, if the input had one.
    pub fn version(&self) -> Option<u32> {
        self.version
    }

    /// Reads the tags of an `H` line, checking any version tag against
    /// [`MIN_VERSION`].
    fn read_header_fields<R: Read>(&mut self, stream: &mut ByteStream<R>) -> Result<()> {
        let mut field = Vec::new();
        loop {
            field.clear();
            let delim = read_ascii(stream, &GFA_FIELD, &mut field)?;
            if let Some(text) = field.strip_prefix(VERSION_TAG) {
                let version = parse_version(text).ok_or_else(|| {
                    broken(format!(
                        "malformed version '{}'",
                        String::from_utf8_lossy(text)
                    ))
                })?;
                if version < MIN_VERSION {
                    return Err(FnaError::UnsupportedVersion { version });
                }
                debug!("GFA header version 0x{:06x}", version);
                self.version = Some(version);
            }
            if delim != Delim::Byte(b'\t') {
                return Ok(());
            }
        }
    }

    fn read_segment<R: Read>(
        &self,
        stream: &mut ByteStream<R>,
        settings: &Settings,
    ) -> Result<Option<Record>> {
        let mut builder = RecordBuilder::segment(settings.margins, settings.encoding)?;
        read_field(stream, builder.buf_mut(), "segment name")?;
        builder.finish_name()?;

        let mut transcoder = settings.transcoder;
        let (bases, delim) = read_sequence(stream, &GFA_SEQ, &mut transcoder, builder.buf_mut())?;
        finish_line(stream, delim)?;

        if builder.name_len() == 0 && bases == 0 {
            return Ok(None);
        }
        builder.finish_sequence(bases)?;
        builder.build().map(Some)
    }

    fn read_link<R: Read>(
        &self,
        stream: &mut ByteStream<R>,
        settings: &Settings,
    ) -> Result<Record> {
        let mut builder = RecordBuilder::link(settings.margins)?;
        read_field(stream, builder.buf_mut(), "link source")?;
        builder.finish_name()?;
        let from = read_orientation(stream)?;

        read_field(stream, builder.buf_mut(), "link target")?;
        builder.finish_target()?;
        let to = read_orientation(stream)?;

        let delim = read_ascii(stream, &GFA_FIELD, builder.buf_mut())?;
        builder.finish_cigar()?;
        finish_line(stream, delim)?;

        builder.set_orientations(from, to);
        builder.build()
    }
}

impl FormatDriver for GfaDriver {
    fn format(&self) -> FormatKind {
        FormatKind::Gfa
    }

    fn read_header<R: Read>(&mut self, stream: &mut ByteStream<R>) -> Result<()> {
        loop {
            match stream.peek(1)?.first().copied() {
                Some(b'\n' | b'\r') => {
                    stream.getc()?;
                }
                Some(b'#') => {
                    skip(stream, &LINE)?;
                }
                _ => break,
            }
        }
        if stream.peek(2)? != b"H\t" {
            debug!("GFA input has no header line");
            return Ok(());
        }
        stream.getc()?;
        stream.getc()?;
        self.read_header_fields(stream)
    }

    fn read_record<R: Read>(
        &mut self,
        stream: &mut ByteStream<R>,
        settings: &Settings,
    ) -> Result<Option<Record>> {
        loop {
            let kind = match stream.getc()? {
                Some(b) => b,
                None => return Ok(None),
            };
            match kind {
                b'\n' | b'\r' => continue,
                b'S' => {
                    expect_tab(stream, "record type")?;
                    return self.read_segment(stream, settings);
                }
                b'L' => {
                    expect_tab(stream, "record type")?;
                    return self.read_link(stream, settings).map(Some);
                }
                b'H' if self.version.is_none() => {
                    expect_tab(stream, "record type")?;
                    self.read_header_fields(stream)?;
                }
                b'H' | b'C' | b'P' | b'#' => {
                    trace!("skipping GFA '{}' line", kind as char);
                    skip(stream, &LINE)?;
                }
                other => {
                    return Err(broken(format!(
                        "unexpected record type '{}'",
                        other.escape_ascii()
                    )))
                }
            }
        }
    }
}
