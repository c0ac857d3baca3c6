// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{fmt, io};

#[derive(Debug)]
pub enum SeqconsError {
    Io(io::Error),
    Format(String),
    Alignment(String),
    Aligner(String),
}

// These allow conversion to SeqconsError, required for main() to return Result<()> and for '?' to
// work.

impl From<io::Error> for SeqconsError {
    fn from(e: io::Error) -> Self {
        SeqconsError::Io(e)
    }
}

impl From<String> for SeqconsError {
    fn from(s: String) -> Self {
        SeqconsError::Format(s)
    }
}

impl From<serde_json::Error> for SeqconsError {
    fn from(e: serde_json::Error) -> Self {
        SeqconsError::Format(e.to_string())
    }
}

impl fmt::Display for SeqconsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqconsError::Io(e) => write!(f, "I/O error: {}", e),
            SeqconsError::Format(msg) => write!(f, "Format error: {}", msg),
            SeqconsError::Alignment(msg) => write!(f, "Alignment error: {}", msg),
            SeqconsError::Aligner(msg) => write!(f, "Aligner error: {}", msg),
        }
    }
}

impl std::error::Error for SeqconsError {}
