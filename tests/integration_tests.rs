use fna_parser::{
    Encoding, FnaError, FormatKind, Options, Orientation, Record, Session, SessionParams, Status,
};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn parse(data: &[u8], params: SessionParams) -> Vec<Record> {
    Session::from_reader(data, params)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn temp_file(suffix: &str, data: &[u8]) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

fn gzip(data: &[u8]) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn test_fasta_scenario() {
    let data = b">test0\nAAAA\n> test1\nATAT\nCGCG\n>  test2\n\nAAAA\n";
    let mut session = Session::from_reader(&data[..], SessionParams::new()).unwrap();
    assert_eq!(session.format(), FormatKind::Fasta);

    let mut got = Vec::new();
    while let Some(record) = session.read().unwrap() {
        assert_eq!(session.status(), Status::Success);
        let segment = record.into_segment().unwrap();
        got.push((
            segment.name_str().unwrap().to_string(),
            segment.seq_str().unwrap().to_string(),
        ));
    }
    assert_eq!(session.status(), Status::Eof);
    assert_eq!(
        got,
        vec![
            ("test0".to_string(), "AAAA".to_string()),
            ("test1".to_string(), "ATATCGCG".to_string()),
            ("test2".to_string(), "AAAA".to_string()),
        ]
    );
}

#[test]
fn test_fastq_scenario() {
    let records = parse(b"@test0\nAAAA\n+test0\nNNNN\n", SessionParams::new());
    assert_eq!(records.len(), 1);
    let segment = records[0].as_segment().unwrap();
    assert_eq!(segment.name(), b"test0");
    assert_eq!(segment.seq(), b"AAAA");
    assert_eq!(segment.qual(), b"NNNN");
}

#[test]
fn test_gfa_scenario() {
    let records = parse(
        b"H\tVN:Z:1.0\nS\t11\tACCTT\nL\t11\t+\t12\t-\t4M\n",
        SessionParams::new(),
    );
    assert_eq!(records.len(), 2);

    let segment = records[0].as_segment().unwrap();
    assert_eq!(segment.name(), b"11");
    assert_eq!(segment.seq(), b"ACCTT");

    let link = records[1].as_link().unwrap();
    assert_eq!(link.from(), b"11");
    assert_eq!(link.from_orientation(), Orientation::Forward);
    assert_eq!(link.to(), b"12");
    assert_eq!(link.to_orientation(), Orientation::Reverse);
    assert_eq!(link.cigar(), b"4M");
    assert_eq!(records[1].to_string(), "L\t11\t+\t12\t-\t4M");
}

#[test]
fn test_gfa_version_gate() {
    let result = Session::from_reader(&b"H\tVN:Z:0.9\nS\t1\tA\n"[..], SessionParams::new());
    match result {
        Err(FnaError::UnsupportedVersion { version }) => assert_eq!(version, 0x900),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("expected the version to be rejected"),
    }
}

#[test]
fn test_gfa_version_gate_after_comment() {
    let params = SessionParams::new().format(FormatKind::Gfa);
    let result = Session::from_reader(&b"# made by x\nH\tVN:Z:0.9\nS\t1\tA\n"[..], params);
    assert!(matches!(
        result,
        Err(FnaError::UnsupportedVersion { version: 0x900 })
    ));
}

#[test]
fn test_broken_link_reports_status() {
    let data = b"H\tVN:Z:1.0\nL\t11\t*\t12\t-\t4M\n";
    let mut session = Session::from_reader(&data[..], SessionParams::new()).unwrap();
    assert!(session.read().is_err());
    assert_eq!(session.status(), Status::BrokenFormat);
    assert!(session.status().is_error());
}

#[test]
fn test_quality_length_mismatch_reports_status() {
    let data = b"@r\nACGT\n+\nII\n@s\nAC\n+\nII\n";
    let mut session = Session::from_reader(&data[..], SessionParams::new()).unwrap();
    assert!(session.read().is_err());
    assert_eq!(session.status(), Status::BrokenFormat);
}

#[test]
fn test_eof_is_idempotent() {
    let mut session = Session::from_reader(&b"@r\nAC\n+\nII\n"[..], SessionParams::new()).unwrap();
    assert!(session.read().unwrap().is_some());
    for _ in 0..5 {
        assert!(session.read().unwrap().is_none());
        assert_eq!(session.status(), Status::Eof);
    }
    session.close();
    assert!(session.read().unwrap().is_none());
}

#[test]
fn test_empty_record_ends_stream() {
    let records = parse(b">a\nAC\n>\n>b\nGT\n", SessionParams::new());
    assert_eq!(records.len(), 1);
}

#[test]
fn test_encodings_agree() {
    let data = b">r\nACGTRYN\nacgt\n";
    let ascii = parse(data, SessionParams::new());
    let ascii = ascii[0].as_segment().unwrap();

    for encoding in [
        Encoding::TwoBit,
        Encoding::TwoBitPacked,
        Encoding::FourBit,
        Encoding::FourBitPacked,
    ] {
        let records = parse(data, SessionParams::new().encoding(encoding));
        let segment = records[0].as_segment().unwrap();
        assert_eq!(segment.encoding(), encoding);
        assert_eq!(segment.len(), ascii.len());
        assert_eq!(segment.seq().len(), encoding.encoded_len(ascii.len()));
    }

    let four_bit = parse(data, SessionParams::new().encoding(Encoding::FourBit));
    assert_eq!(four_bit[0].as_segment().unwrap().decoded_seq(), b"ACGTRYNACGT");
    let two_bit = parse(data, SessionParams::new().encoding(Encoding::TwoBit));
    assert_eq!(two_bit[0].as_segment().unwrap().decoded_seq(), b"ACGTAAAACGT");
}

#[test]
fn test_margins_in_records() {
    let params = SessionParams::new()
        .encoding(Encoding::TwoBitPacked)
        .head_margin(10)
        .tail_margin(20)
        .seq_head_margin(1)
        .seq_tail_margin(16);
    let records = parse(b"@r\nACGTA\n+\nIIIII\n", params);
    let mut record = records.into_iter().next().unwrap();
    assert_eq!(record.head_margin(), 16);
    assert_eq!(record.tail_margin(), 32);

    record.head_margin_mut().fill(0xAA);
    record.tail_margin_mut().fill(0xBB);
    let bytes = record.as_bytes();
    assert!(bytes[..16].iter().all(|&b| b == 0xAA));
    assert!(bytes[bytes.len() - 32..].iter().all(|&b| b == 0xBB));

    let segment = record.as_segment().unwrap();
    assert_eq!(segment.len(), 5);
    assert_eq!(segment.seq(), &[0b1110_0100, 0b0000_0000]);
    assert_eq!(segment.qual(), b"IIIII");
    assert_eq!(segment.decoded_seq(), b"ACGTA");
}

#[test]
fn test_skip_quality_option() {
    let params = SessionParams::new().options(Options::SKIP_QUALITY);
    let records = parse(b"@r\nACGT\n+\nIIII\n@s\nGG\n+\n@@\n", params);
    assert_eq!(records.len(), 2);
    for record in &records {
        assert!(record.as_segment().unwrap().qual().is_empty());
    }
}

#[test]
fn test_file_reader_by_extension() {
    // content alone would be unknown, the extension decides
    let file = temp_file(".fa", b"\x00\n>seq\nACGT\n");
    let mut session = Session::open(file.path(), SessionParams::new()).unwrap();
    assert_eq!(session.format(), FormatKind::Fasta);
    assert_eq!(session.path(), Some(file.path()));
    let record = session.read().unwrap().unwrap();
    assert_eq!(record.as_segment().unwrap().seq(), b"ACGT");
    session.close();
    session.close();
}

#[test]
fn test_file_reader_sniffs_content() {
    let file = temp_file(".txt", b"@SEQ_1\nACGT\n+\nIIII\n@SEQ_2\nTGCA\n+\nJJJJ\n");
    let session = Session::open(file.path(), SessionParams::new()).unwrap();
    assert_eq!(session.format(), FormatKind::Fastq);
    let records: Vec<_> = session.collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].as_segment().unwrap().name(), b"SEQ_2");
}

#[test]
fn test_gzip_reader() {
    let file = temp_file(".fastq.gz", &gzip(b"@SEQ_1\nACGT\n+\nIIII\n"));
    let session = Session::open(file.path(), SessionParams::new()).unwrap();
    assert_eq!(session.format(), FormatKind::Fastq);
    let records: Vec<_> = session.collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].as_segment().unwrap().qual(), b"IIII");
}

#[test]
fn test_gzip_gfa_sniffed() {
    let file = temp_file(".gz", &gzip(b"H\tVN:Z:1.0\nS\ts\tAC\n"));
    let session = Session::open(file.path(), SessionParams::new()).unwrap();
    assert_eq!(session.format(), FormatKind::Gfa);
    assert_eq!(session.count(), 1);
}

#[test]
fn test_empty_file() {
    let file = temp_file(".fasta", b"");
    let mut session = Session::open(file.path(), SessionParams::new()).unwrap();
    assert!(session.read().unwrap().is_none());
    assert_eq!(session.status(), Status::Eof);

    let file = temp_file(".dat", b"");
    assert!(matches!(
        Session::open(file.path(), SessionParams::new()),
        Err(FnaError::UnknownFormat)
    ));
}

#[test]
fn test_missing_file() {
    let err = Session::open("/nonexistent/reads.fq", SessionParams::new()).err().unwrap();
    assert_eq!(Status::from(&err), Status::FileOpen);
}

#[cfg(not(feature = "fast5"))]
#[test]
fn test_fast5_unsupported_build() {
    let file = temp_file(".fast5", b"\x89HDF\r\n\x1a\n");
    let err = Session::open(file.path(), SessionParams::new()).err().unwrap();
    assert_eq!(Status::from(&err), Status::UnsupportedBuild);
}

#[cfg(feature = "fast5")]
#[test]
fn test_fast5_reports_eof() {
    let file = temp_file(".fast5", b"\x89HDF\r\n\x1a\n");
    let mut session = Session::open(file.path(), SessionParams::new()).unwrap();
    assert!(session.read().unwrap().is_none());
    assert_eq!(session.status(), Status::Eof);
}

#[test]
fn test_large_input() {
    let mut data = Vec::new();
    let num_records = 10000;
    for i in 0..num_records {
        writeln!(data, "@SEQ_{} description", i).unwrap();
        writeln!(data, "{}", "ACGT".repeat(19)).unwrap();
        writeln!(data, "+").unwrap();
        writeln!(data, "{}", "I".repeat(76)).unwrap();
    }

    let params = SessionParams::new().encoding(Encoding::FourBitPacked);
    let records = parse(&data, params);
    assert_eq!(records.len(), num_records);
    let last = records[num_records - 1].as_segment().unwrap();
    assert_eq!(last.name_str().unwrap(), "SEQ_9999 description");
    assert_eq!(last.len(), 76);
    assert_eq!(last.seq().len(), 38);
}
