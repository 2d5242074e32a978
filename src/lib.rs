//! Streaming parser for FASTA, FASTQ and GFA (segments and links).
//!
//! Each record is assembled into a single allocation holding a fixed header,
//! the name, the sequence in one of five encodings and the quality, with
//! optional padding around the record and around the sequence.
//!
//! ```no_run
//! use fna_parser::{Encoding, Session, SessionParams};
//!
//! let params = SessionParams::new().encoding(Encoding::TwoBitPacked);
//! let mut session = Session::open("reads.fq.gz", params)?;
//! while let Some(record) = session.read()? {
//!     if let Some(segment) = record.as_segment() {
//!         println!("{}\t{}", segment.name_str().unwrap_or("?"), segment.len());
//!     }
//! }
//! session.close();
//! # Ok::<(), fna_parser::FnaError>(())
//! ```

pub mod buffer;
pub mod builder;
pub mod encode;
pub mod error;
#[cfg(feature = "fast5")]
pub mod fast5;
pub mod fasta;
pub mod fastq;
pub mod format;
pub mod gfa;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod record;
pub mod table;
pub mod token;

pub use encode::{BaseTranscoder, Encoding, Transcoder};
pub use error::{FnaError, Result, Status};
pub use format::FormatKind;
pub use layout::{Layout, Margins, RecordKind, Region};
pub use parser::{FormatDriver, Options};
pub use reader::{Session, SessionParams};
pub use record::{Link, Orientation, Record, Segment};
