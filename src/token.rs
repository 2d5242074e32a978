use crate::buffer::ByteStream;
use crate::builder::push_byte;
use crate::encode::BaseTranscoder;
use crate::error::Result;
use crate::table::{ByteTable, DELIM, ORDINARY, SKIP, SPACE};
use std::io::Read;

/// What ended a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delim {
    Byte(u8),
    Eof,
}

impl Delim {
    #[inline]
    pub fn is_eof(&self) -> bool {
        *self == Delim::Eof
    }

    #[inline]
    fn from_option(b: Option<u8>) -> Self {
        b.map_or(Delim::Eof, Delim::Byte)
    }
}

/// Appends the next token to `out`, trimmed of surrounding spaces, and
/// returns the delimiter that ended it.
pub fn read_ascii<R: Read>(
    stream: &mut ByteStream<R>,
    table: &ByteTable,
    out: &mut Vec<u8>,
) -> Result<Delim> {
    let start = out.len();

    let mut b = loop {
        match stream.getc()? {
            None => return Ok(Delim::Eof),
            Some(b) if matches!(table.class(b), SPACE | SKIP) => continue,
            Some(b) => break b,
        }
    };

    let delim = loop {
        match table.class(b) {
            DELIM => break Delim::Byte(b),
            SKIP => {}
            _ => push_byte(out, b)?,
        }
        b = match stream.getc()? {
            Some(b) => b,
            None => break Delim::Eof,
        };
    };

    while out.len() > start && table.class(out[out.len() - 1]) == SPACE {
        out.pop();
    }
    Ok(delim)
}

/// Discards input through the next delimiter of `table`.
#[inline]
pub fn skip<R: Read>(stream: &mut ByteStream<R>, table: &ByteTable) -> Result<Delim> {
    Ok(Delim::from_option(stream.skip_to_any(table.delims())?))
}

/// Streams the ordinary bytes up to the next delimiter through `transcoder`
/// into `out`. Returns the number of bases consumed.
pub fn read_sequence<R: Read, T: BaseTranscoder>(
    stream: &mut ByteStream<R>,
    table: &ByteTable,
    transcoder: &mut T,
    out: &mut Vec<u8>,
) -> Result<(usize, Delim)> {
    let mut bases = 0;
    let delim = loop {
        let b = match stream.getc()? {
            Some(b) => b,
            None => break Delim::Eof,
        };
        match table.class(b) {
            ORDINARY => {
                bases += 1;
                if let Some(code) = transcoder.push(b) {
                    push_byte(out, code)?;
                }
            }
            DELIM => break Delim::Byte(b),
            _ => {}
        }
    };
    if let Some(code) = transcoder.flush() {
        push_byte(out, code)?;
    }
    Ok((bases, delim))
}
