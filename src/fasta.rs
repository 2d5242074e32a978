use crate::buffer::ByteStream;
use crate::builder::RecordBuilder;
use crate::error::Result;
use crate::format::FormatKind;
use crate::parser::{FormatDriver, Settings};
use crate::record::Record;
use crate::table::{FASTA_SEQ, FASTA_START, LINE};
use crate::token::{read_ascii, read_sequence, skip, Delim};
use std::io::Read;

/// `>name` line followed by sequence lines up to the next `>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastaDriver;

impl FormatDriver for FastaDriver {
    fn format(&self) -> FormatKind {
        FormatKind::Fasta
    }

    fn read_record<R: Read>(
        &mut self,
        stream: &mut ByteStream<R>,
        settings: &Settings,
    ) -> Result<Option<Record>> {
        if skip(stream, &FASTA_START)?.is_eof() {
            return Ok(None);
        }

        let mut builder = RecordBuilder::segment(settings.margins, settings.encoding)?;
        read_ascii(stream, &LINE, builder.buf_mut())?;
        builder.finish_name()?;

        let mut transcoder = settings.transcoder;
        let (bases, delim) =
            read_sequence(stream, &FASTA_SEQ, &mut transcoder, builder.buf_mut())?;
        if let Delim::Byte(b) = delim {
            stream.ungetc(b);
        }

        if builder.name_len() == 0 && bases == 0 {
            return Ok(None);
        }
        builder.finish_sequence(bases)?;
        builder.build().map(Some)
    }
}
