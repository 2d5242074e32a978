use crate::encode::{decode_sequence, Encoding};
use crate::error::{FnaError, Result};
use crate::layout::{Layout, RecordHeader, RecordKind, Region, HEADER_SIZE};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    #[inline]
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'+' => Some(Orientation::Forward),
            b'-' => Some(Orientation::Reverse),
            _ => None,
        }
    }

    /// `+1` for forward, `-1` for reverse.
    #[inline]
    pub fn sign(&self) -> i8 {
        match self {
            Orientation::Forward => 1,
            Orientation::Reverse => -1,
        }
    }

    #[inline]
    pub fn as_byte(&self) -> u8 {
        match self {
            Orientation::Forward => b'+',
            Orientation::Reverse => b'-',
        }
    }

    fn from_sign(sign: i8) -> Option<Self> {
        match sign {
            1 => Some(Orientation::Forward),
            -1 => Some(Orientation::Reverse),
            _ => None,
        }
    }
}

/// The one backing allocation of a record, margins included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawRecord {
    buf: Vec<u8>,
    header: RecordHeader,
    layout: Layout,
    head_margin: usize,
    tail_margin: usize,
}

impl RawRecord {
    pub(crate) fn new(
        buf: Vec<u8>,
        header: RecordHeader,
        head_margin: usize,
        tail_margin: usize,
    ) -> Self {
        let layout = Layout::new(&header, head_margin, tail_margin);
        debug_assert_eq!(layout.total(), buf.len());
        RawRecord {
            buf,
            header,
            layout,
            head_margin,
            tail_margin,
        }
    }

    #[inline]
    fn slot(&self, region: Region, len: u32) -> &[u8] {
        let start = self.layout.offset(region);
        &self.buf[start..start + len as usize]
    }

    #[inline]
    fn region_mut(&mut self, region: Region) -> &mut [u8] {
        let range = self.layout.range(region);
        &mut self.buf[range]
    }
}

/// A named sequence: a FASTA or FASTQ record, or a GFA `S` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    raw: RawRecord,
}

impl Segment {
    #[inline]
    pub fn name(&self) -> &[u8] {
        self.raw.slot(Region::Name, self.raw.header.name_len)
    }

    #[inline]
    pub fn name_str(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(self.name())
    }

    /// Encoded sequence bytes, without the ASCII terminator.
    #[inline]
    pub fn seq(&self) -> &[u8] {
        self.raw.slot(Region::Sequence, self.raw.header.seq_len)
    }

    #[inline]
    pub fn seq_str(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(self.seq())
    }

    /// Quality bytes; empty for FASTA, GFA, or when quality was skipped.
    #[inline]
    pub fn qual(&self) -> &[u8] {
        self.raw.slot(Region::Quality, self.raw.header.qual_len)
    }

    #[inline]
    pub fn qual_str(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(self.qual())
    }

    #[inline]
    pub fn has_quality(&self) -> bool {
        self.raw.header.has_quality()
    }

    /// Number of bases, whatever the encoding.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.header.bases as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.raw.header.encoding
    }

    /// The sequence expanded back to ASCII.
    pub fn decoded_seq(&self) -> Vec<u8> {
        decode_sequence(self.seq(), self.len(), self.encoding())
    }

    pub fn seq_head_margin_mut(&mut self) -> &mut [u8] {
        self.raw.region_mut(Region::SeqHeadMargin)
    }

    pub fn seq_tail_margin_mut(&mut self) -> &mut [u8] {
        self.raw.region_mut(Region::SeqTailMargin)
    }
}

/// Writes arbitrary bytes, replacing invalid UTF-8.
fn write_lossy(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str(&String::from_utf8_lossy(bytes))
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.has_quality() { '@' } else { '>' };
        write!(f, "{}", marker)?;
        write_lossy(f, self.name())?;
        f.write_str("\n")?;
        write_lossy(f, &self.decoded_seq())?;
        if self.has_quality() {
            f.write_str("\n+\n")?;
            write_lossy(f, self.qual())?;
        }
        Ok(())
    }
}

/// An oriented connection between two segment ends (GFA `L` line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    raw: RawRecord,
}

impl Link {
    #[inline]
    pub fn from(&self) -> &[u8] {
        self.raw.slot(Region::Name, self.raw.header.name_len)
    }

    #[inline]
    pub fn from_orientation(&self) -> Orientation {
        Orientation::from_sign(self.raw.header.from_orientation).unwrap_or(Orientation::Forward)
    }

    #[inline]
    pub fn to(&self) -> &[u8] {
        self.raw.slot(Region::Sequence, self.raw.header.seq_len)
    }

    #[inline]
    pub fn to_orientation(&self) -> Orientation {
        Orientation::from_sign(self.raw.header.to_orientation).unwrap_or(Orientation::Forward)
    }

    #[inline]
    pub fn cigar(&self) -> &[u8] {
        self.raw.slot(Region::Quality, self.raw.header.qual_len)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("L\t")?;
        write_lossy(f, self.from())?;
        write!(f, "\t{}\t", self.from_orientation().as_byte() as char)?;
        write_lossy(f, self.to())?;
        write!(f, "\t{}\t", self.to_orientation().as_byte() as char)?;
        write_lossy(f, self.cigar())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Segment(Segment),
    Link(Link),
}

impl Record {
    pub(crate) fn from_raw(raw: RawRecord) -> Self {
        match raw.header.kind {
            RecordKind::Segment => Record::Segment(Segment { raw }),
            RecordKind::Link => Record::Link(Link { raw }),
        }
    }

    /// Rebuilds a record from a buffer obtained through [`Record::into_buffer`].
    pub fn from_buffer(buf: Vec<u8>, head_margin: usize, tail_margin: usize) -> Result<Self> {
        let corrupt = |msg: &str| FnaError::CorruptRecord { msg: msg.to_string() };
        if buf.len() < head_margin + HEADER_SIZE {
            return Err(corrupt("buffer shorter than the record header"));
        }
        let header = RecordHeader::read(&buf[head_margin..])
            .ok_or_else(|| corrupt("unrecognised record header"))?;
        if header.kind == RecordKind::Segment
            && header.seq_len as usize != header.encoding.encoded_len(header.bases as usize)
        {
            return Err(corrupt("sequence length does not match the base count"));
        }
        let layout = Layout::new(&header, head_margin, tail_margin);
        if layout.total() != buf.len() {
            return Err(corrupt("buffer length does not match the header"));
        }
        if buf[layout.offset(Region::Name) + header.name_len as usize] != 0 {
            return Err(corrupt("name is not NUL-terminated"));
        }
        Ok(Record::from_raw(RawRecord::new(
            buf,
            header,
            head_margin,
            tail_margin,
        )))
    }

    #[inline]
    fn raw(&self) -> &RawRecord {
        match self {
            Record::Segment(s) => &s.raw,
            Record::Link(l) => &l.raw,
        }
    }

    #[inline]
    fn raw_mut(&mut self) -> &mut RawRecord {
        match self {
            Record::Segment(s) => &mut s.raw,
            Record::Link(l) => &mut l.raw,
        }
    }

    #[inline]
    pub fn kind(&self) -> RecordKind {
        self.raw().header.kind
    }

    pub fn as_segment(&self) -> Option<&Segment> {
        match self {
            Record::Segment(s) => Some(s),
            Record::Link(_) => None,
        }
    }

    pub fn into_segment(self) -> Option<Segment> {
        match self {
            Record::Segment(s) => Some(s),
            Record::Link(_) => None,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Record::Link(l) => Some(l),
            Record::Segment(_) => None,
        }
    }

    pub fn into_link(self) -> Option<Link> {
        match self {
            Record::Link(l) => Some(l),
            Record::Segment(_) => None,
        }
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.raw().layout
    }

    #[inline]
    pub fn head_margin(&self) -> usize {
        self.raw().head_margin
    }

    #[inline]
    pub fn tail_margin(&self) -> usize {
        self.raw().tail_margin
    }

    pub fn head_margin_mut(&mut self) -> &mut [u8] {
        self.raw_mut().region_mut(Region::HeadMargin)
    }

    pub fn tail_margin_mut(&mut self) -> &mut [u8] {
        self.raw_mut().region_mut(Region::TailMargin)
    }

    /// The whole backing buffer, margins included.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw().buf
    }

    pub fn into_buffer(self) -> Vec<u8> {
        match self {
            Record::Segment(s) => s.raw.buf,
            Record::Link(l) => l.raw.buf,
        }
    }

    /// Frees the backing allocation. Equivalent to dropping the record.
    pub fn release(self) {}
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Segment(s) => s.fmt(f),
            Record::Link(l) => l.fmt(f),
        }
    }
}
