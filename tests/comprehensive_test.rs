use fna_parser::{
    Encoding, FormatKind, Options, Record, RecordKind, Region, Result, Session, SessionParams,
    Status,
};
use proptest::prelude::*;

fn read_all(data: &[u8], params: SessionParams) -> Result<Vec<Record>> {
    Session::from_reader(data, params)?.collect()
}

#[test]
fn test_basic_parsing() -> Result<()> {
    let data = b"@SEQ_ID\nGATTTGGGGTTCAAAGCAGTATCGATCAAATAGTAAATCCATTTGTTCAACTCACAGTTT\n+\n!''*((((***+))%%%++)(%%%%).1***-+*''))**55CCF>>>>>>CCCCCCC65\n";
    let mut session = Session::from_reader(&data[..], SessionParams::new())?;

    let record = session.read()?.expect("Should parse record");
    let segment = record.as_segment().expect("FASTQ yields segments");
    assert_eq!(segment.name(), b"SEQ_ID");
    assert_eq!(segment.len(), 60);
    assert_eq!(segment.qual().len(), 60);

    Ok(())
}

#[test]
fn test_layout_regions_are_contiguous() -> Result<()> {
    let params = SessionParams::new()
        .head_margin(32)
        .tail_margin(16)
        .seq_head_margin(16)
        .seq_tail_margin(48);
    let records = read_all(b"@r1\nACGTACGT\n+\nIIIIIIII\n", params)?;
    let layout = records[0].layout();

    let mut end = 0;
    for (_, range) in layout.iter() {
        assert_eq!(range.start, end);
        end = range.end;
    }
    assert_eq!(end, layout.total());
    assert_eq!(end, records[0].as_bytes().len());
    assert_eq!(layout.offset(Region::Header), 32);
    assert_eq!(layout.len(Region::SeqTailMargin), 48);
    // name, sequence and quality each carry a terminator in ASCII mode
    assert_eq!(layout.len(Region::Name), 3 + 1);
    assert_eq!(layout.len(Region::Sequence), 8 + 1);
    assert_eq!(layout.len(Region::Quality), 8 + 1);

    Ok(())
}

#[test]
fn test_packed_sequence_is_not_terminated() -> Result<()> {
    let params = SessionParams::new().encoding(Encoding::FourBitPacked);
    let records = read_all(b">r\nACG\n", params)?;
    let layout = records[0].layout();
    assert_eq!(layout.len(Region::Sequence), 2);
    assert_eq!(records[0].as_segment().unwrap().seq(), &[0x21, 0x04]);
    Ok(())
}

#[test]
fn test_record_buffer_round_trip() -> Result<()> {
    let params = SessionParams::new().head_margin(16).tail_margin(16);
    let records = read_all(b"H\tVN:Z:1.2.0\nL\ta\t-\tb\t+\t10M\n", params)?;
    let original = records.into_iter().next().expect("one link");
    assert_eq!(original.kind(), RecordKind::Link);

    let copy = original.clone();
    let buf = original.into_buffer();
    let rebuilt = Record::from_buffer(buf, 16, 16)?;
    assert_eq!(rebuilt, copy);
    assert_eq!(rebuilt.as_link().unwrap().cigar(), b"10M");
    rebuilt.release();

    Ok(())
}

#[test]
fn test_display_formats() -> Result<()> {
    let records = read_all(b"@r\nAC\n+\nII\n", SessionParams::new().encoding(Encoding::TwoBit))?;
    assert_eq!(records[0].to_string(), "@r\nAC\n+\nII");

    let records = read_all(b">r\nAC\n", SessionParams::new())?;
    assert_eq!(records[0].to_string(), ">r\nAC");
    Ok(())
}

#[test]
fn test_params_from_json() {
    let params: SessionParams = serde_json::from_str(
        r#"{"format": "gfa", "encoding": "four_bit_packed", "options": 1, "seq_head_margin": 8}"#,
    )
    .unwrap();
    assert_eq!(params.format, Some(FormatKind::Gfa));
    assert_eq!(params.encoding, Encoding::FourBitPacked);
    assert!(params.options.contains(Options::SKIP_QUALITY));
    assert_eq!(params.margins().seq_head, 16);
    assert_eq!(params.head_margin, 0);

    let empty: SessionParams = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, SessionParams::default());

    let json = serde_json::to_string(&params).unwrap();
    let back: SessionParams = serde_json::from_str(&json).unwrap();
    assert_eq!(back, params);
}

#[test]
fn test_status_after_each_call() -> Result<()> {
    let mut session = Session::from_reader(&b">a\nA\n>b\nC\n"[..], SessionParams::new())?;
    assert_eq!(session.status(), Status::Success);
    session.read()?;
    session.read()?;
    assert_eq!(session.status(), Status::Success);
    assert!(session.read()?.is_none());
    assert_eq!(session.status(), Status::Eof);
    Ok(())
}

fn wrap(seq: &str, width: usize) -> String {
    seq.as_bytes()
        .chunks(width)
        .map(|c| std::str::from_utf8(c).unwrap())
        .collect::<Vec<_>>()
        .join("\n")
}

proptest! {
    /// Concatenating the parsed sequences gives back the input sequences,
    /// whatever the line wrapping.
    #[test]
    fn prop_fasta_sequences_round_trip(
        seqs in prop::collection::vec("[ACGTN]{1,200}", 1..20),
        width in 1usize..80,
    ) {
        let mut data = String::new();
        for (i, seq) in seqs.iter().enumerate() {
            data.push_str(&format!(">seq{} sample\n{}\n", i, wrap(seq, width)));
        }

        let records = read_all(data.as_bytes(), SessionParams::new()).unwrap();
        prop_assert_eq!(records.len(), seqs.len());

        let mut joined = Vec::new();
        for (i, record) in records.iter().enumerate() {
            let segment = record.as_segment().unwrap();
            prop_assert_eq!(segment.name_str().unwrap(), format!("seq{} sample", i));
            joined.extend_from_slice(segment.seq());
        }
        prop_assert_eq!(joined, seqs.concat().into_bytes());
    }

    /// Every encoding keeps the base count and decodes to the same class of base.
    #[test]
    fn prop_encodings_decode(seq in "[ACGT]{1,300}") {
        let data = format!("@r\n{}\n+\n{}\n", seq, "I".repeat(seq.len()));
        for encoding in [Encoding::TwoBit, Encoding::TwoBitPacked, Encoding::FourBit, Encoding::FourBitPacked] {
            let records = read_all(data.as_bytes(), SessionParams::new().encoding(encoding)).unwrap();
            let segment = records[0].as_segment().unwrap();
            prop_assert_eq!(segment.len(), seq.len());
            prop_assert_eq!(segment.seq().len(), encoding.encoded_len(seq.len()));
            prop_assert_eq!(segment.decoded_seq(), seq.as_bytes().to_vec());
        }
    }

    /// Quality strings come back intact, including `@` inside them.
    #[test]
    fn prop_fastq_quality_kept(qual in "[!-~]{1,150}") {
        let seq = "A".repeat(qual.len());
        let data = format!("@r1\n{}\n+\n{}\n@r2\nC\n+\nI\n", seq, qual);
        let records = read_all(data.as_bytes(), SessionParams::new()).unwrap();
        prop_assert_eq!(records.len(), 2);
        prop_assert_eq!(records[0].as_segment().unwrap().qual(), qual.as_bytes());
        prop_assert_eq!(records[1].as_segment().unwrap().name(), b"r2");
    }
}
