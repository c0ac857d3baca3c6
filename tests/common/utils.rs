// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::{
    path::PathBuf,
    process::{Command, Output},
};

use seqcons::{
    errors::SeqconsError,
    seq::{
        fasta::{read_fasta_str, to_fasta_string},
        record::SeqRecord,
    },
};

// Stand-in for an external aligner: pads every sequence with trailing gaps up to the longest one.
#[allow(dead_code)]
pub fn pad_aligner(fasta: &str) -> Result<String, SeqconsError> {
    let records = read_fasta_str(fasta)?;
    let width = records.iter().map(|r| r.sequence.len()).max().unwrap_or(0);
    let padded: Vec<SeqRecord> = records
        .into_iter()
        .map(|r| {
            let seq = format!("{:-<width$}", r.sequence, width = width);
            SeqRecord::new(r.header, seq)
        })
        .collect();
    to_fasta_string(&padded)
}

#[allow(dead_code)]
pub fn data_path(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(rel)
}

// Runs one of the crate's binaries in an empty directory with an empty HOME, so that no config
// file gets picked up.
#[allow(dead_code)]
pub fn run_bin(exe: &str, args: &[&str], stdin_data: Option<&[u8]>) -> Output {
    use std::io::Write;
    use std::process::Stdio;

    let scratch = tempfile::tempdir().expect("scratch dir");
    let mut child = Command::new(exe)
        .args(args)
        .current_dir(scratch.path())
        .env("HOME", scratch.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn binary");
    {
        let mut stdin = child.stdin.take().expect("stdin");
        if let Some(data) = stdin_data {
            stdin.write_all(data).expect("write stdin");
        }
    }
    child.wait_with_output().expect("binary output")
}
