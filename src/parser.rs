use crate::buffer::ByteStream;
use crate::encode::{Encoding, Transcoder};
use crate::error::Result;
#[cfg(feature = "fast5")]
use crate::fast5::Fast5Driver;
use crate::fasta::FastaDriver;
use crate::fastq::FastqDriver;
use crate::format::FormatKind;
use crate::gfa::GfaDriver;
use crate::layout::Margins;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::ops::BitOr;

/// Parser option bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(u32);

impl Options {
    pub const NONE: Options = Options(0);
    /// Discard FASTQ quality bytes; records report an empty quality.
    pub const SKIP_QUALITY: Options = Options(0x01);

    #[inline]
    pub fn from_bits(bits: u32) -> Self {
        Options(bits)
    }

    #[inline]
    pub fn bits(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn contains(&self, other: Options) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Options {
    type Output = Options;

    fn bitor(self, rhs: Options) -> Options {
        Options(self.0 | rhs.0)
    }
}

/// Everything a driver needs besides the stream, fixed when the session opens.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub encoding: Encoding,
    pub transcoder: Transcoder,
    pub margins: Margins,
    pub options: Options,
}

impl Settings {
    pub fn new(encoding: Encoding, margins: Margins, options: Options) -> Self {
        Settings {
            encoding,
            transcoder: encoding.transcoder(),
            margins,
            options,
        }
    }
}

pub trait FormatDriver {
    fn format(&self) -> FormatKind;

    /// Runs once, right after the stream is opened.
    fn read_header<R: Read>(&mut self, _stream: &mut ByteStream<R>) -> Result<()> {
        Ok(())
    }

    /// Parses the next record; `Ok(None)` at end of input.
    fn read_record<R: Read>(
        &mut self,
        stream: &mut ByteStream<R>,
        settings: &Settings,
    ) -> Result<Option<Record>>;
}

pub enum Driver {
    Fasta(FastaDriver),
    Fastq(FastqDriver),
    Gfa(GfaDriver),
    #[cfg(feature = "fast5")]
    Fast5(Fast5Driver),
}

impl Driver {
    pub fn for_format(format: FormatKind) -> Result<Self> {
        match format {
            FormatKind::Fasta => Ok(Driver::Fasta(FastaDriver)),
            FormatKind::Fastq => Ok(Driver::Fastq(FastqDriver)),
            FormatKind::Gfa => Ok(Driver::Gfa(GfaDriver::default())),
            #[cfg(feature = "fast5")]
            FormatKind::Fast5 => Ok(Driver::Fast5(Fast5Driver)),
            #[cfg(not(feature = "fast5"))]
            FormatKind::Fast5 => Err(crate::error::FnaError::UnsupportedBuild { format }),
        }
    }
}

impl FormatDriver for Driver {
    fn format(&self) -> FormatKind {
        match self {
            Driver::Fasta(d) => d.format(),
            Driver::Fastq(d) => d.format(),
            Driver::Gfa(d) => d.format(),
            #[cfg(feature = "fast5")]
            Driver::Fast5(d) => d.format(),
        }
    }

    fn read_header<R: Read>(&mut self, stream: &mut ByteStream<R>) -> Result<()> {
        match self {
            Driver::Fasta(d) => d.read_header(stream),
            Driver::Fastq(d) => d.read_header(stream),
            Driver::Gfa(d) => d.read_header(stream),
            #[cfg(feature = "fast5")]
            Driver::Fast5(d) => d.read_header(stream),
        }
    }

    fn read_record<R: Read>(
        &mut self,
        stream: &mut ByteStream<R>,
        settings: &Settings,
    ) -> Result<Option<Record>> {
        match self {
            Driver::Fasta(d) => d.read_record(stream, settings),
            Driver::Fastq(d) => d.read_record(stream, settings),
            Driver::Gfa(d) => d.read_record(stream, settings),
            #[cfg(feature = "fast5")]
            Driver::Fast5(d) => d.read_record(stream, settings),
        }
    }
}
