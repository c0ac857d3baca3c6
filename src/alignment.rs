// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use itertools::Itertools;
use log::debug;

use crate::errors::SeqconsError;
use crate::seq::file::SeqFile;

pub const GAP: u8 = b'-';

// An alignment set: same-length sequences sharing one column coordinate system. Headers and
// sequences are parallel Vecs, in input order.
#[derive(Debug, Clone)]
pub struct Alignment {
    headers: Vec<String>,
    sequences: Vec<String>,
}

impl Alignment {
    pub fn from_file(seq_file: SeqFile) -> Result<Self, SeqconsError> {
        let (headers, sequences): (Vec<String>, Vec<String>) = seq_file
            .into_iter()
            .map(|rec| (rec.header, rec.sequence))
            .unzip();
        Alignment::from_vecs(headers, sequences)
    }

    pub fn from_vecs(headers: Vec<String>, sequences: Vec<String>) -> Result<Self, SeqconsError> {
        if sequences.is_empty() {
            return Err(SeqconsError::Alignment(String::from("Empty alignment")));
        }
        if headers.len() != sequences.len() {
            return Err(SeqconsError::Alignment(format!(
                "{} headers but {} sequences",
                headers.len(),
                sequences.len()
            )));
        }
        // Columns are byte offsets.
        if let Some(pos) = sequences.iter().position(|s| !s.is_ascii()) {
            return Err(SeqconsError::Alignment(format!(
                "Sequence {} contains non-ASCII symbols",
                headers[pos]
            )));
        }
        if !sequences.iter().map(|s| s.len()).all_equal() {
            let lengths = sequences.iter().map(|s| s.len()).unique().join(", ");
            return Err(SeqconsError::Alignment(format!(
                "Sequences differ in length ({}); input is not aligned",
                lengths
            )));
        }
        // Some formats use '.' for gaps as well
        let sequences: Vec<String> = sequences
            .into_iter()
            .map(|s| s.replace('.', "-"))
            .collect();
        debug!(
            "Alignment: {} sequences x {} columns",
            sequences.len(),
            sequences[0].len()
        );
        Ok(Alignment { headers, sequences })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn sequences(&self) -> &[String] {
        &self.sequences
    }

    pub fn num_seq(&self) -> usize {
        self.sequences.len()
    }

    pub fn aln_len(&self) -> usize {
        self.sequences[0].len()
    }

    // Symbols of column `col`, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = u8> + '_ {
        self.sequences.iter().map(move |s| s.as_bytes()[col])
    }
}
