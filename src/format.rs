use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Number of leading bytes inspected when sniffing the format from content.
pub const SNIFF_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Fasta,
    Fastq,
    Gfa,
    Fast5,
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatKind::Fasta => "FASTA",
            FormatKind::Fastq => "FASTQ",
            FormatKind::Gfa => "GFA",
            FormatKind::Fast5 => "FAST5",
        };
        f.write_str(name)
    }
}

const EXTENSIONS: &[(&str, FormatKind)] = &[
    ("fasta", FormatKind::Fasta),
    ("fas", FormatKind::Fasta),
    ("seq", FormatKind::Fasta),
    ("fna", FormatKind::Fasta),
    ("ffn", FormatKind::Fasta),
    ("fa", FormatKind::Fasta),
    ("fastq", FormatKind::Fastq),
    ("fq", FormatKind::Fastq),
    ("fast5", FormatKind::Fast5),
    ("f5", FormatKind::Fast5),
    ("gfa", FormatKind::Gfa),
];

/// Returns true when the path names a gzip-compressed file.
#[inline]
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

impl FormatKind {
    /// Guesses the format from the file extension, looking through a trailing `.gz`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let path = if is_gzip_path(path) {
            Path::new(path.file_stem()?)
        } else {
            path
        };
        let ext = path.extension()?.to_str()?;
        EXTENSIONS
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            .map(|&(_, kind)| kind)
    }

    /// Guesses the format from the first bytes of the stream.
    pub fn sniff(head: &[u8]) -> Option<Self> {
        let head = &head[..head.len().min(SNIFF_LEN)];
        let start = head.iter().position(|b| !b.is_ascii_whitespace())?;
        match head[start] {
            b'>' => Some(FormatKind::Fasta),
            b'@' => Some(FormatKind::Fastq),
            b'H' if head.get(start + 1) == Some(&b'\t') => Some(FormatKind::Gfa),
            _ => None,
        }
    }
}
