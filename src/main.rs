use clap::{Parser, ValueEnum};
use fna_parser::{Encoding, FormatKind, Options, Record, Result, Session, SessionParams};
use log::info;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Fasta,
    Fastq,
    Gfa,
    Fast5,
}

impl From<FormatArg> for FormatKind {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Fasta => FormatKind::Fasta,
            FormatArg::Fastq => FormatKind::Fastq,
            FormatArg::Gfa => FormatKind::Gfa,
            FormatArg::Fast5 => FormatKind::Fast5,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum EncodingArg {
    Ascii,
    TwoBit,
    TwoBitPacked,
    FourBit,
    FourBitPacked,
}

impl From<EncodingArg> for Encoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Ascii => Encoding::Ascii,
            EncodingArg::TwoBit => Encoding::TwoBit,
            EncodingArg::TwoBitPacked => Encoding::TwoBitPacked,
            EncodingArg::FourBit => Encoding::FourBit,
            EncodingArg::FourBitPacked => Encoding::FourBitPacked,
        }
    }
}

/// Parse FASTA, FASTQ or GFA files (optionally gzipped) and print records or statistics
#[derive(Parser)]
#[command(version, arg_required_else_help = true)]
struct Cli {
    /// input file, format guessed from the extension or the content
    input: PathBuf,

    /// input format, overrides detection
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// sequence encoding used while parsing
    #[arg(long, value_enum, default_value = "ascii")]
    encoding: EncodingArg,

    /// do not keep FASTQ quality strings
    #[arg(long)]
    skip_quality: bool,

    /// print a summary instead of the records
    #[arg(long)]
    stats: bool,

    /// stop after this many records
    #[arg(long)]
    head: Option<usize>,
}

#[derive(Default)]
struct Stats {
    segments: usize,
    links: usize,
    bases: usize,
    min_length: Option<usize>,
    max_length: usize,
}

impl Stats {
    fn add(&mut self, record: &Record) {
        match record {
            Record::Segment(segment) => {
                let len = segment.len();
                self.segments += 1;
                self.bases += len;
                self.min_length = Some(self.min_length.map_or(len, |m| m.min(len)));
                self.max_length = self.max_length.max(len);
            }
            Record::Link(_) => self.links += 1,
        }
    }

    fn print_summary(&self) {
        println!("\nStatistics:");
        println!("  Segments: {}", self.segments);
        println!("  Links: {}", self.links);
        println!("  Total bases: {}", self.bases);
        if self.segments > 0 {
            println!("  Min length: {}", self.min_length.unwrap_or(0));
            println!("  Max length: {}", self.max_length);
            println!(
                "  Average length: {:.2}",
                self.bases as f64 / self.segments as f64
            );
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let mut params = SessionParams::new().encoding(cli.encoding.into());
    if let Some(format) = cli.format {
        params = params.format(format.into());
    }
    if cli.skip_quality {
        params = params.options(Options::SKIP_QUALITY);
    }

    let start = Instant::now();
    let mut session = Session::open(&cli.input, params)?;
    info!(
        "Parsing {} as {} ({:?} encoding)",
        cli.input.display(),
        session.format(),
        session.encoding()
    );

    let mut stats = Stats::default();
    let mut out = BufWriter::new(io::stdout().lock());
    let limit = cli.head.unwrap_or(usize::MAX);

    while stats.segments + stats.links < limit {
        let record = match session.read()? {
            Some(record) => record,
            None => break,
        };
        stats.add(&record);
        if !cli.stats {
            writeln!(out, "{}", record)?;
        }
        if (stats.segments + stats.links) % 100_000 == 0 {
            info!("Processed {} records...", stats.segments + stats.links);
        }
    }
    out.flush()?;
    session.close();

    if cli.stats {
        stats.print_summary();
    }
    info!("Processing time: {:.3} seconds", start.elapsed().as_secs_f64());

    Ok(())
}
