// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

// FastA I/O is delegated to rust-bio; this module only maps its records onto SeqRecord and its
// errors onto SeqconsError.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use bio::io::fasta;

use crate::errors::SeqconsError;
use crate::seq::file::SeqFile;
use crate::seq::record::SeqRecord;

fn to_seq_record(record: &fasta::Record) -> Result<SeqRecord, SeqconsError> {
    let header = match record.desc() {
        Some(desc) if !desc.trim().is_empty() => format!("{} {}", record.id(), desc.trim()),
        _ => record.id().to_string(),
    };
    let sequence = String::from_utf8(record.seq().to_vec()).map_err(|e| {
        SeqconsError::Format(format!("Sequence {} is not UTF-8: {}", record.id(), e))
    })?;
    Ok(SeqRecord::new(header, sequence))
}

pub fn read_fasta<R: BufRead>(reader: R) -> Result<SeqFile, SeqconsError> {
    let mut result: SeqFile = Vec::new();
    for record in fasta::Reader::new(reader).records() {
        let record =
            record.map_err(|e| SeqconsError::Format(format!("Malformed FastA: {}", e)))?;
        result.push(to_seq_record(&record)?);
    }

    if result.is_empty() {
        return Err(SeqconsError::Format(String::from("No sequences found")));
    }
    Ok(result)
}

pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> Result<SeqFile, SeqconsError> {
    let file = File::open(path)?;
    read_fasta(BufReader::new(file))
}

pub fn read_fasta_str(text: &str) -> Result<SeqFile, SeqconsError> {
    read_fasta(text.as_bytes())
}

// The header goes to the writer as id + description, the way the reader split it.
fn write_record<W: Write>(
    writer: &mut fasta::Writer<W>,
    header: &str,
    sequence: &[u8],
) -> Result<(), SeqconsError> {
    let mut fields = header.splitn(2, char::is_whitespace);
    let id = fields.next().unwrap_or("");
    let desc = fields.next().map(str::trim).filter(|d| !d.is_empty());
    writer.write(id, desc, sequence)?;
    Ok(())
}

// Writes one record, wrapping the sequence every `width` symbols (0: no wrapping).
pub fn write_fasta<W: Write>(
    writer: &mut W,
    header: &str,
    sequence: &str,
    width: usize,
) -> Result<(), SeqconsError> {
    let wrapped: Vec<u8> = if width == 0 || sequence.len() <= width {
        sequence.as_bytes().to_vec()
    } else {
        sequence.as_bytes().chunks(width).collect::<Vec<_>>().join(&b'\n')
    };
    let mut fasta_writer = fasta::Writer::new(writer);
    write_record(&mut fasta_writer, header, &wrapped)?;
    fasta_writer.flush()?;
    Ok(())
}

pub fn to_fasta_string(records: &[SeqRecord]) -> Result<String, SeqconsError> {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut fasta_writer = fasta::Writer::new(&mut buf);
        for rec in records {
            write_record(&mut fasta_writer, &rec.header, rec.sequence.as_bytes())?;
        }
        fasta_writer.flush()?;
    }
    String::from_utf8(buf).map_err(|e| SeqconsError::Format(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_fasta_file_1() {
        let path = "data/test1.fas";
        let fasta: SeqFile = read_fasta_file(path).expect("Test file not found");
        assert_eq!(fasta[0].header, "seq1");
        assert_eq!(fasta[0].sequence, "GAATTC");
    }

    #[test]
    fn test_read_fasta_file_2() {
        let path = "data/test2.fas";
        let fasta: SeqFile = read_fasta_file(path).expect("Test file not found");
        assert_eq!(fasta.len(), 3);
        assert_eq!(fasta[0].header, "seq1");
        assert_eq!(fasta[0].sequence, "TTGCCG-CGA");
        assert_eq!(fasta[1].header, "seq2");
        assert_eq!(fasta[1].sequence, "TTCCCGGCGA");
        assert_eq!(fasta[2].header, "seq3");
        assert_eq!(fasta[2].sequence, "TTACCG-CAA");
    }

    #[test]
    fn test_read_fasta_multiline_and_blank_lines() {
        let text = ">a some description\nACGT\nAC\n\n>b\n\nGG\nTT\n";
        let fasta = read_fasta_str(text).expect("valid FastA");
        assert_eq!(fasta.len(), 2);
        assert_eq!(fasta[0].header, "a some description");
        assert_eq!(fasta[0].id(), "a");
        assert_eq!(fasta[0].sequence, "ACGTAC");
        assert_eq!(fasta[1].sequence, "GGTT");
    }

    #[test]
    fn test_read_fasta_crlf() {
        let fasta = read_fasta_str(">a\r\nAC\r\nGT\r\n").expect("valid FastA");
        assert_eq!(fasta[0].header, "a");
        assert_eq!(fasta[0].sequence, "ACGT");
    }

    #[test]
    fn test_read_fasta_empty_record_kept() {
        let fasta = read_fasta_str(">a\n>b\nAC\n").expect("valid FastA");
        assert_eq!(fasta.len(), 2);
        assert_eq!(fasta[0].sequence, "");
        assert_eq!(fasta[1].sequence, "AC");
    }

    #[test]
    fn test_read_fasta_no_header() {
        let res = read_fasta_str("ACGT\n>a\nAC\n");
        assert!(matches!(res, Err(SeqconsError::Format(_))));
    }

    #[test]
    fn test_read_fasta_desc_whitespace() {
        let fasta = read_fasta_str(">a\tsome  description \nAC\n").expect("valid FastA");
        assert_eq!(fasta[0].id(), "a");
        assert_eq!(fasta[0].header, "a some  description");
    }

    #[test]
    fn test_write_fasta_keeps_description() {
        let mut out: Vec<u8> = Vec::new();
        write_fasta(&mut out, "R1 first read", "AC", 60).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ">R1 first read\nAC\n");
    }

    #[test]
    fn test_read_fasta_empty_input() {
        assert!(matches!(read_fasta_str(""), Err(SeqconsError::Format(_))));
        assert!(matches!(read_fasta_str("\n\n"), Err(SeqconsError::Format(_))));
    }

    #[test]
    fn test_read_fasta_missing_file() {
        let res = read_fasta_file("data/no-such-file.fas");
        assert!(matches!(res, Err(SeqconsError::Io(_))));
    }

    #[test]
    fn test_write_fasta_wraps() {
        let mut out: Vec<u8> = Vec::new();
        write_fasta(&mut out, "cons", "ACGTACGTAC", 4).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ">cons\nACGT\nACGT\nAC\n");
    }

    #[test]
    fn test_write_fasta_exact_width() {
        let mut out: Vec<u8> = Vec::new();
        write_fasta(&mut out, "cons", "ACGTACGT", 4).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ">cons\nACGT\nACGT\n");
    }

    #[test]
    fn test_write_fasta_no_wrap() {
        let mut out: Vec<u8> = Vec::new();
        write_fasta(&mut out, "cons", "ACGTACGTAC", 0).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ">cons\nACGTACGTAC\n");
    }

    #[test]
    fn test_to_fasta_string_reads_back() {
        let records = vec![
            SeqRecord::new("x first", "ACGT"),
            SeqRecord::new("y", "AC-T"),
        ];
        let text = to_fasta_string(&records).unwrap();
        assert_eq!(text, ">x first\nACGT\n>y\nAC-T\n");
        assert_eq!(read_fasta_str(&text).unwrap(), records);
    }
}
