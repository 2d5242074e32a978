//! Byte classification tables.
//!
//! Every grammar context gets its own 256-entry table mapping a byte to a
//! class. The tokenizer only ever asks "what is this byte here", so adding a
//! context means adding a table, not touching the lexer.

/// Token content.
pub const ORDINARY: u8 = 0;
/// Kept inside a token, trimmed from both of its ends.
pub const SPACE: u8 = 1;
/// Dropped wherever it appears (line breaks inside sequences, stray controls).
pub const SKIP: u8 = 2;
/// Terminates the current token.
pub const DELIM: u8 = 3;

#[derive(Debug)]
pub struct ByteTable {
    classes: [u8; 256],
    delims: &'static [u8],
}

#[derive(Clone, Copy)]
enum Context {
    /// Names, header lines and GFA fields: spaces survive inside the token.
    Text,
    /// Sequence bodies: only printable non-space ASCII survives.
    Sequence,
}

const fn classes(context: Context, delims: &[u8], extra_skip: &[u8]) -> [u8; 256] {
    let mut t = [ORDINARY; 256];
    let mut i = 0;
    while i < 256 {
        let control = i < 0x20 || i == 0x7f;
        let high = i >= 0x80;
        t[i] = match context {
            Context::Text if control => SKIP,
            Context::Text => ORDINARY,
            Context::Sequence if control || high => SKIP,
            Context::Sequence => ORDINARY,
        };
        i += 1;
    }
    match context {
        Context::Text => {
            t[b' ' as usize] = SPACE;
            t[b'\t' as usize] = SPACE;
        }
        Context::Sequence => {
            t[b' ' as usize] = SKIP;
        }
    }
    let mut i = 0;
    while i < extra_skip.len() {
        t[extra_skip[i] as usize] = SKIP;
        i += 1;
    }
    let mut i = 0;
    while i < delims.len() {
        t[delims[i] as usize] = DELIM;
        i += 1;
    }
    t
}

impl ByteTable {
    const fn new(context: Context, delims: &'static [u8], extra_skip: &[u8]) -> Self {
        ByteTable {
            classes: classes(context, delims, extra_skip),
            delims,
        }
    }

    #[inline(always)]
    pub fn class(&self, b: u8) -> u8 {
        self.classes[b as usize]
    }

    #[inline(always)]
    pub fn is_delim(&self, b: u8) -> bool {
        self.class(b) == DELIM
    }

    /// The bytes classified as `DELIM`, at most three of them.
    #[inline]
    pub fn delims(&self) -> &'static [u8] {
        self.delims
    }
}

pub static LINE: ByteTable = ByteTable::new(Context::Text, b"\r\n", b"");

pub static FASTA_START: ByteTable = ByteTable::new(Context::Sequence, b">", b"");
pub static FASTA_SEQ: ByteTable = ByteTable::new(Context::Sequence, b">", b"");

pub static FASTQ_START: ByteTable = ByteTable::new(Context::Sequence, b"@", b"");
pub static FASTQ_SEQ: ByteTable = ByteTable::new(Context::Sequence, b"+", b"");
pub static FASTQ_QUAL: ByteTable = ByteTable::new(Context::Sequence, b"@", b"");

pub static GFA_FIELD: ByteTable = ByteTable::new(Context::Text, b"\t\r\n", b"");
// `*` marks an absent segment sequence.
pub static GFA_SEQ: ByteTable = ByteTable::new(Context::Sequence, b"\t\r\n", b"*");
