//! Single-allocation record layout.
//!
//! ```text
//! [head margin][header][name\0][seq head margin][sequence(\0)][seq tail margin][quality\0][tail margin]
//! ```
//!
//! The header is fixed size and little-endian; every other offset follows
//! from the lengths it stores. Links reuse the three slots for `from`, `to`
//! and `cigar`, all NUL-terminated and without sequence margins.

use crate::encode::Encoding;
use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const HEADER_SIZE: usize = 48;
pub const MARGIN_ALIGN: usize = 16;

const KIND_SEGMENT: u8 = 0;
const KIND_LINK: u8 = 1;

/// The quality slot is present (FASTQ segments).
pub const FLAG_QUALITY: u32 = 0x01;

#[inline]
pub fn round_margin(size: usize) -> usize {
    size.div_ceil(MARGIN_ALIGN) * MARGIN_ALIGN
}

/// Padding reserved around a record and around its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub head: usize,
    pub tail: usize,
    pub seq_head: usize,
    pub seq_tail: usize,
}

impl Margins {
    /// Builds margins rounded up to the 16-byte boundary.
    pub fn new(head: usize, tail: usize, seq_head: usize, seq_tail: usize) -> Self {
        Margins {
            head: round_margin(head),
            tail: round_margin(tail),
            seq_head: round_margin(seq_head),
            seq_tail: round_margin(seq_tail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Segment,
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub kind: RecordKind,
    pub encoding: Encoding,
    pub from_orientation: i8,
    pub to_orientation: i8,
    pub flags: u32,
    pub bases: u64,
    pub name_len: u32,
    pub seq_len: u32,
    pub qual_len: u32,
    pub seq_head_margin: u32,
    pub seq_tail_margin: u32,
}

impl RecordHeader {
    pub fn new(kind: RecordKind, encoding: Encoding) -> Self {
        RecordHeader {
            kind,
            encoding,
            from_orientation: 0,
            to_orientation: 0,
            flags: 0,
            bases: 0,
            name_len: 0,
            seq_len: 0,
            qual_len: 0,
            seq_head_margin: 0,
            seq_tail_margin: 0,
        }
    }

    #[inline]
    pub fn has_quality(&self) -> bool {
        self.kind == RecordKind::Link || self.flags & FLAG_QUALITY != 0
    }

    #[inline]
    pub fn seq_terminated(&self) -> bool {
        self.kind == RecordKind::Link || self.encoding.is_nul_terminated()
    }

    pub fn write(&self, out: &mut [u8]) {
        debug_assert!(out.len() >= HEADER_SIZE);
        out[0] = match self.kind {
            RecordKind::Segment => KIND_SEGMENT,
            RecordKind::Link => KIND_LINK,
        };
        out[1] = self.encoding.to_u8();
        out[2] = self.from_orientation as u8;
        out[3] = self.to_orientation as u8;
        LittleEndian::write_u32(&mut out[4..8], self.flags);
        LittleEndian::write_u64(&mut out[8..16], self.bases);
        LittleEndian::write_u32(&mut out[16..20], self.name_len);
        LittleEndian::write_u32(&mut out[20..24], self.seq_len);
        LittleEndian::write_u32(&mut out[24..28], self.qual_len);
        LittleEndian::write_u32(&mut out[28..32], self.seq_head_margin);
        LittleEndian::write_u32(&mut out[32..36], self.seq_tail_margin);
        out[36..HEADER_SIZE].fill(0);
    }

    pub fn read(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_SIZE {
            return None;
        }
        let kind = match buf[0] {
            KIND_SEGMENT => RecordKind::Segment,
            KIND_LINK => RecordKind::Link,
            _ => return None,
        };
        Some(RecordHeader {
            kind,
            encoding: Encoding::from_u8(buf[1])?,
            from_orientation: buf[2] as i8,
            to_orientation: buf[3] as i8,
            flags: LittleEndian::read_u32(&buf[4..8]),
            bases: LittleEndian::read_u64(&buf[8..16]),
            name_len: LittleEndian::read_u32(&buf[16..20]),
            seq_len: LittleEndian::read_u32(&buf[20..24]),
            qual_len: LittleEndian::read_u32(&buf[24..28]),
            seq_head_margin: LittleEndian::read_u32(&buf[28..32]),
            seq_tail_margin: LittleEndian::read_u32(&buf[32..36]),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    HeadMargin,
    Header,
    Name,
    SeqHeadMargin,
    Sequence,
    SeqTailMargin,
    Quality,
    TailMargin,
}

/// Ordered `(region, length)` pairs describing one record buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    regions: [(Region, usize); 8],
}

impl Layout {
    pub fn new(header: &RecordHeader, head_margin: usize, tail_margin: usize) -> Self {
        let seq_nul = usize::from(header.seq_terminated());
        let qual = if header.has_quality() {
            header.qual_len as usize + 1
        } else {
            0
        };
        Layout {
            regions: [
                (Region::HeadMargin, head_margin),
                (Region::Header, HEADER_SIZE),
                (Region::Name, header.name_len as usize + 1),
                (Region::SeqHeadMargin, header.seq_head_margin as usize),
                (Region::Sequence, header.seq_len as usize + seq_nul),
                (Region::SeqTailMargin, header.seq_tail_margin as usize),
                (Region::Quality, qual),
                (Region::TailMargin, tail_margin),
            ],
        }
    }

    pub fn offset(&self, region: Region) -> usize {
        self.regions
            .iter()
            .take_while(|(r, _)| *r != region)
            .map(|&(_, len)| len)
            .sum()
    }

    pub fn len(&self, region: Region) -> usize {
        self.regions
            .iter()
            .find(|(r, _)| *r == region)
            .map_or(0, |&(_, len)| len)
    }

    pub fn range(&self, region: Region) -> Range<usize> {
        let start = self.offset(region);
        start..start + self.len(region)
    }

    pub fn total(&self) -> usize {
        self.regions.iter().map(|&(_, len)| len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Region, Range<usize>)> + '_ {
        self.regions.iter().scan(0, |offset, &(region, len)| {
            let range = *offset..*offset + len;
            *offset += len;
            Some((region, range))
        })
    }
}
