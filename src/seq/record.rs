// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

// A record for sequences, consisting of some description and a raw sequence. The header is
// everything after the '>', the id is its first word.

#[derive(Debug, Clone, PartialEq)]
pub struct SeqRecord {
    pub header: String,
    pub sequence: String,
}

impl SeqRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        SeqRecord {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    pub fn id(&self) -> &str {
        self.header.split_whitespace().next().unwrap_or("")
    }
}
