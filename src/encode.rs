//! Nucleotide transcoders.
//!
//! Five encodings are supported:
//!
//! | encoding        | bits/base | bases/byte | notes                              |
//! |-----------------|-----------|------------|------------------------------------|
//! | `Ascii`         | 8         | 1          | verbatim, NUL-terminated in record |
//! | `TwoBit`        | 2         | 1          | `A,C,G,T/U = 0,1,2,3`              |
//! | `TwoBitPacked`  | 2         | 4          | first base in the low bits         |
//! | `FourBit`       | 4         | 1          | IUPAC set, `A=1 C=2 G=4 T/U=8`     |
//! | `FourBitPacked` | 4         | 2          | first base in the low nibble       |
//!
//! Bytes without a code (including `N`) encode as 0: `A` in 2-bit, the empty
//! set in 4-bit.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    #[default]
    Ascii,
    TwoBit,
    TwoBitPacked,
    FourBit,
    FourBitPacked,
}

impl Encoding {
    pub fn transcoder(self) -> Transcoder {
        match self {
            Encoding::Ascii => Transcoder::Ascii(AsciiTranscoder),
            Encoding::TwoBit => Transcoder::Code(CodeTranscoder::new(&TWO_BIT)),
            Encoding::FourBit => Transcoder::Code(CodeTranscoder::new(&FOUR_BIT)),
            Encoding::TwoBitPacked => Transcoder::Packed(PackedTranscoder::new(2, &TWO_BIT)),
            Encoding::FourBitPacked => Transcoder::Packed(PackedTranscoder::new(4, &FOUR_BIT)),
        }
    }

    #[inline]
    pub fn is_nul_terminated(self) -> bool {
        self == Encoding::Ascii
    }

    #[inline]
    pub fn bases_per_byte(self) -> usize {
        match self {
            Encoding::Ascii | Encoding::TwoBit | Encoding::FourBit => 1,
            Encoding::TwoBitPacked => 4,
            Encoding::FourBitPacked => 2,
        }
    }

    /// Bytes needed to hold `bases` bases.
    #[inline]
    pub fn encoded_len(self, bases: usize) -> usize {
        bases.div_ceil(self.bases_per_byte())
    }

    pub(crate) fn to_u8(self) -> u8 {
        match self {
            Encoding::Ascii => 0,
            Encoding::TwoBit => 1,
            Encoding::TwoBitPacked => 2,
            Encoding::FourBit => 3,
            Encoding::FourBitPacked => 4,
        }
    }

    pub(crate) fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Encoding::Ascii),
            1 => Some(Encoding::TwoBit),
            2 => Some(Encoding::TwoBitPacked),
            3 => Some(Encoding::FourBit),
            4 => Some(Encoding::FourBitPacked),
            _ => None,
        }
    }
}

const A: u8 = 1;
const C: u8 = 2;
const G: u8 = 4;
const T: u8 = 8;

const fn set_both_cases(mut t: [u8; 256], c: u8, code: u8) -> [u8; 256] {
    t[c.to_ascii_uppercase() as usize] = code;
    t[c.to_ascii_lowercase() as usize] = code;
    t
}

const fn two_bit_table() -> [u8; 256] {
    let t = [0u8; 256];
    let t = set_both_cases(t, b'A', 0);
    let t = set_both_cases(t, b'C', 1);
    let t = set_both_cases(t, b'G', 2);
    let t = set_both_cases(t, b'T', 3);
    let t = set_both_cases(t, b'U', 3);
    set_both_cases(t, b'N', 0)
}

const fn four_bit_table() -> [u8; 256] {
    let t = [0u8; 256];
    let t = set_both_cases(t, b'A', A);
    let t = set_both_cases(t, b'C', C);
    let t = set_both_cases(t, b'G', G);
    let t = set_both_cases(t, b'T', T);
    let t = set_both_cases(t, b'U', T);
    let t = set_both_cases(t, b'R', A | G);
    let t = set_both_cases(t, b'Y', C | T);
    let t = set_both_cases(t, b'S', C | G);
    let t = set_both_cases(t, b'W', A | T);
    let t = set_both_cases(t, b'K', G | T);
    let t = set_both_cases(t, b'M', A | C);
    let t = set_both_cases(t, b'B', C | G | T);
    let t = set_both_cases(t, b'D', A | G | T);
    let t = set_both_cases(t, b'H', A | C | T);
    let t = set_both_cases(t, b'V', A | C | G);
    set_both_cases(t, b'N', 0)
}

static TWO_BIT: [u8; 256] = two_bit_table();
static FOUR_BIT: [u8; 256] = four_bit_table();

const TWO_BIT_DECODE: &[u8; 4] = b"ACGT";
const FOUR_BIT_DECODE: &[u8; 16] = b"NACMGRSVTWYHKDBN";

#[inline]
pub fn encode_2bit(base: u8) -> u8 {
    TWO_BIT[base as usize]
}

#[inline]
pub fn encode_4bit(base: u8) -> u8 {
    FOUR_BIT[base as usize]
}

#[inline]
pub fn decode_2bit(code: u8) -> u8 {
    TWO_BIT_DECODE[(code & 0x03) as usize]
}

#[inline]
pub fn decode_4bit(code: u8) -> u8 {
    FOUR_BIT_DECODE[(code & 0x0f) as usize]
}

/// Expands an encoded sequence of `bases` bases back to upper-case ASCII.
///
/// Decoding stops early if `bytes` holds fewer than `bases` bases.
pub fn decode_sequence(bytes: &[u8], bases: usize, encoding: Encoding) -> Vec<u8> {
    let bases = bases.min(bytes.len().saturating_mul(encoding.bases_per_byte()));
    match encoding {
        Encoding::Ascii => bytes[..bases].to_vec(),
        Encoding::TwoBit => bytes[..bases].iter().map(|&c| decode_2bit(c)).collect(),
        Encoding::FourBit => bytes[..bases].iter().map(|&c| decode_4bit(c)).collect(),
        Encoding::TwoBitPacked => (0..bases)
            .map(|i| decode_2bit(bytes[i / 4] >> ((i % 4) * 2)))
            .collect(),
        Encoding::FourBitPacked => (0..bases)
            .map(|i| decode_4bit(bytes[i / 2] >> ((i % 2) * 4)))
            .collect(),
    }
}

/// Turns bases into output bytes one at a time.
///
/// `push` returns a byte whenever one is complete; `flush` emits whatever
/// partial byte is left once the sequence ends.
pub trait BaseTranscoder {
    fn push(&mut self, base: u8) -> Option<u8>;

    fn flush(&mut self) -> Option<u8> {
        None
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiTranscoder;

impl BaseTranscoder for AsciiTranscoder {
    #[inline(always)]
    fn push(&mut self, base: u8) -> Option<u8> {
        Some(base)
    }
}

/// One code per output byte.
#[derive(Debug, Clone, Copy)]
pub struct CodeTranscoder {
    table: &'static [u8; 256],
}

impl CodeTranscoder {
    fn new(table: &'static [u8; 256]) -> Self {
        CodeTranscoder { table }
    }
}

impl BaseTranscoder for CodeTranscoder {
    #[inline(always)]
    fn push(&mut self, base: u8) -> Option<u8> {
        Some(self.table[base as usize])
    }
}

/// Several codes per output byte, earliest base in the lowest bits.
///
/// Codes enter at the top of the accumulator and shift down as more arrive,
/// so a full byte needs no reordering and a partial one is aligned with a
/// single right shift by the unused bit count.
#[derive(Debug, Clone, Copy)]
pub struct PackedTranscoder {
    table: &'static [u8; 256],
    bits: u8,
    acc: u8,
    offset: u8,
}

impl PackedTranscoder {
    fn new(bits: u8, table: &'static [u8; 256]) -> Self {
        debug_assert!(bits == 2 || bits == 4);
        PackedTranscoder {
            table,
            bits,
            acc: 0,
            offset: 0,
        }
    }
}

impl BaseTranscoder for PackedTranscoder {
    #[inline(always)]
    fn push(&mut self, base: u8) -> Option<u8> {
        let code = self.table[base as usize];
        self.acc = (self.acc >> self.bits) | (code << (8 - self.bits));
        self.offset += self.bits;
        if self.offset == 8 {
            let out = self.acc;
            self.acc = 0;
            self.offset = 0;
            Some(out)
        } else {
            None
        }
    }

    fn flush(&mut self) -> Option<u8> {
        if self.offset == 0 {
            return None;
        }
        let out = self.acc >> (8 - self.offset);
        self.acc = 0;
        self.offset = 0;
        Some(out)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Transcoder {
    Ascii(AsciiTranscoder),
    Code(CodeTranscoder),
    Packed(PackedTranscoder),
}

impl BaseTranscoder for Transcoder {
    #[inline(always)]
    fn push(&mut self, base: u8) -> Option<u8> {
        match self {
            Transcoder::Ascii(t) => t.push(base),
            Transcoder::Code(t) => t.push(base),
            Transcoder::Packed(t) => t.push(base),
        }
    }

    fn flush(&mut self) -> Option<u8> {
        match self {
            Transcoder::Ascii(t) => t.flush(),
            Transcoder::Code(t) => t.flush(),
            Transcoder::Packed(t) => t.flush(),
        }
    }
}
