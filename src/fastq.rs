use crate::buffer::ByteStream;
use crate::builder::{push_byte, RecordBuilder};
use crate::error::{FnaError, Result};
use crate::format::FormatKind;
use crate::parser::{FormatDriver, Options, Settings};
use crate::record::Record;
use crate::table::{FASTQ_QUAL, FASTQ_SEQ, FASTQ_START, LINE, SKIP};
use crate::token::{read_ascii, read_sequence, skip, Delim};
use std::io::Read;

/// Four-part records: `@name`, sequence lines, `+` line, quality lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastqDriver;

/// Reads quality bytes up to the `@` that opens the next record.
///
/// `@` is also a valid quality character, so it only ends the block when it
/// starts a line and at least `bases` quality bytes have been seen. Bytes
/// are appended to `out` unless it is `None`.
fn read_quality<R: Read>(
    stream: &mut ByteStream<R>,
    bases: usize,
    mut out: Option<&mut Vec<u8>>,
) -> Result<usize> {
    let mut count = 0;
    let mut line_start = true;
    while let Some(b) = stream.getc()? {
        match b {
            b'\n' | b'\r' => line_start = true,
            b'@' if line_start && count >= bases => {
                stream.ungetc(b);
                break;
            }
            _ if FASTQ_QUAL.class(b) == SKIP => {}
            _ => {
                line_start = false;
                count += 1;
                if let Some(out) = out.as_deref_mut() {
                    push_byte(out, b)?;
                }
            }
        }
    }
    Ok(count)
}

impl FormatDriver for FastqDriver {
    fn format(&self) -> FormatKind {
        FormatKind::Fastq
    }

    fn read_record<R: Read>(
        &mut self,
        stream: &mut ByteStream<R>,
        settings: &Settings,
    ) -> Result<Option<Record>> {
        if skip(stream, &FASTQ_START)?.is_eof() {
            return Ok(None);
        }

        let mut builder = RecordBuilder::segment(settings.margins, settings.encoding)?;
        read_ascii(stream, &LINE, builder.buf_mut())?;
        builder.finish_name()?;

        let mut transcoder = settings.transcoder;
        let (bases, delim) =
            read_sequence(stream, &FASTQ_SEQ, &mut transcoder, builder.buf_mut())?;
        if builder.name_len() == 0 && bases == 0 {
            return Ok(None);
        }
        builder.finish_sequence(bases)?;

        if delim == Delim::Byte(b'+') {
            skip(stream, &LINE)?;
            if settings.options.contains(Options::SKIP_QUALITY) {
                read_quality(stream, bases, None)?;
            } else {
                let count = read_quality(stream, bases, Some(builder.buf_mut()))?;
                if count != bases {
                    return Err(FnaError::broken(
                        FormatKind::Fastq,
                        format!(
                            "quality length {} does not match sequence length {}",
                            count, bases
                        ),
                    ));
                }
            }
        }
        builder.finish_quality()?;
        builder.build().map(Some)
    }
}
