use crate::encode::Encoding;
use crate::error::{FnaError, Result};
use crate::layout::{Margins, RecordHeader, RecordKind, FLAG_QUALITY, HEADER_SIZE};
use crate::record::{Orientation, RawRecord, Record};

const INITIAL_CAPACITY: usize = 256;

/// Appends one byte, growing the vector fallibly.
#[inline(always)]
pub(crate) fn push_byte(buf: &mut Vec<u8>, b: u8) -> Result<()> {
    if buf.len() == buf.capacity() {
        buf.try_reserve(buf.len().max(INITIAL_CAPACITY))?;
    }
    buf.push(b);
    Ok(())
}

/// Slot lengths are stored as `u32` in the record header.
fn slot_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| FnaError::FieldTooLarge { len })
}

fn pad(buf: &mut Vec<u8>, n: usize) -> Result<()> {
    buf.try_reserve(n)?;
    buf.resize(buf.len() + n, 0);
    Ok(())
}

/// Accumulates one record into a single growing buffer.
///
/// Slots are filled strictly in layout order: callers append token bytes to
/// `buf_mut()` and then close the slot, which records its length and inserts
/// the terminator and any padding that follows it.
pub struct RecordBuilder {
    buf: Vec<u8>,
    margins: Margins,
    header: RecordHeader,
    mark: usize,
}

impl RecordBuilder {
    pub fn segment(margins: Margins, encoding: Encoding) -> Result<Self> {
        Self::start(RecordKind::Segment, encoding, margins)
    }

    pub fn link(margins: Margins) -> Result<Self> {
        Self::start(RecordKind::Link, Encoding::Ascii, margins)
    }

    fn start(kind: RecordKind, encoding: Encoding, margins: Margins) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve(margins.head + HEADER_SIZE + INITIAL_CAPACITY)?;
        buf.resize(margins.head + HEADER_SIZE, 0);
        let mark = buf.len();
        Ok(RecordBuilder {
            buf,
            margins,
            header: RecordHeader::new(kind, encoding),
            mark,
        })
    }

    #[inline]
    pub fn buf_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }

    /// Bytes appended since the current slot was opened.
    #[inline]
    pub fn pending(&self) -> &[u8] {
        &self.buf[self.mark..]
    }

    #[inline]
    pub fn name_len(&self) -> usize {
        self.header.name_len as usize
    }

    #[inline]
    pub fn bases(&self) -> usize {
        self.header.bases as usize
    }

    fn close_slot(&mut self, terminate: bool, padding: usize) -> Result<u32> {
        let len = slot_len(self.buf.len() - self.mark)?;
        if terminate {
            push_byte(&mut self.buf, 0)?;
        }
        pad(&mut self.buf, padding)?;
        self.mark = self.buf.len();
        Ok(len)
    }

    /// Closes the name slot (`from` for links).
    pub fn finish_name(&mut self) -> Result<()> {
        let padding = match self.header.kind {
            RecordKind::Segment => self.margins.seq_head,
            RecordKind::Link => 0,
        };
        self.header.name_len = self.close_slot(true, padding)?;
        if self.header.kind == RecordKind::Segment {
            self.header.seq_head_margin = slot_len(padding)?;
        }
        Ok(())
    }

    /// Closes the sequence slot after `bases` bases were encoded into it.
    pub fn finish_sequence(&mut self, bases: usize) -> Result<()> {
        let padding = self.margins.seq_tail;
        let terminate = self.header.encoding.is_nul_terminated();
        self.header.seq_len = self.close_slot(terminate, padding)?;
        self.header.seq_tail_margin = slot_len(padding)?;
        self.header.bases = bases as u64;
        Ok(())
    }

    pub fn finish_quality(&mut self) -> Result<()> {
        self.header.qual_len = self.close_slot(true, 0)?;
        self.header.flags |= FLAG_QUALITY;
        Ok(())
    }

    /// Closes the `to` slot of a link.
    pub fn finish_target(&mut self) -> Result<()> {
        self.header.seq_len = self.close_slot(true, 0)?;
        Ok(())
    }

    /// Closes the `cigar` slot of a link.
    pub fn finish_cigar(&mut self) -> Result<()> {
        self.header.qual_len = self.close_slot(true, 0)?;
        Ok(())
    }

    pub fn set_orientations(&mut self, from: Orientation, to: Orientation) {
        self.header.from_orientation = from.sign();
        self.header.to_orientation = to.sign();
    }

    pub fn build(mut self) -> Result<Record> {
        pad(&mut self.buf, self.margins.tail)?;
        let head = self.margins.head;
        self.header.write(&mut self.buf[head..head + HEADER_SIZE]);
        let raw = RawRecord::new(self.buf, self.header, head, self.margins.tail);
        Ok(Record::from_raw(raw))
    }
}
