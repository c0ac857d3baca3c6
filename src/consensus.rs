// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::{cmp::Reverse, fmt};

use itertools::Itertools;
use log::{debug, info};

use crate::alignment::{Alignment, GAP};
use crate::errors::SeqconsError;

pub const DEFAULT_THRESHOLD: f64 = 50.0;
pub const DEFAULT_AMBIGUITY: u8 = b'N';
// Quality reported for unanimous columns, where -10 log10(0) would be infinite.
pub const MAX_PHRED: f64 = 60.0;

// Which symbols are allowed to vote. Lower case marks a low-confidence base call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QualityFilter {
    #[default]
    Case,
    None,
}

impl QualityFilter {
    pub fn passes(self, symbol: u8) -> bool {
        match self {
            QualityFilter::Case => !symbol.is_ascii_lowercase(),
            QualityFilter::None => true,
        }
    }
}

// What to print for a column whose plurality symbol falls short of the threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LowSupport {
    #[default]
    Ambiguity,
    Lowercase,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConsensusParams {
    /// Minimum share of the votes, in percent, for the plurality symbol to be called
    pub threshold: f64,
    /// Emitted for columns that cannot be called
    pub ambiguity: u8,
    pub quality_filter: QualityFilter,
    pub low_support: LowSupport,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        ConsensusParams {
            threshold: DEFAULT_THRESHOLD,
            ambiguity: DEFAULT_AMBIGUITY,
            quality_filter: QualityFilter::Case,
            low_support: LowSupport::Ambiguity,
        }
    }
}

impl ConsensusParams {
    pub fn validate(&self) -> Result<(), SeqconsError> {
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(SeqconsError::Format(format!(
                "Threshold must be a percentage in [0, 100], got {}",
                self.threshold
            )));
        }
        if !self.ambiguity.is_ascii_graphic() {
            return Err(SeqconsError::Format(format!(
                "Ambiguity symbol must be a printable ASCII character, got {:?}",
                self.ambiguity as char
            )));
        }
        Ok(())
    }
}

// The outcome of the vote at one alignment column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnCall {
    /// Symbol written to the consensus
    pub symbol: u8,
    /// Plurality symbol (upper case), None if every symbol was filtered out
    pub winner: Option<u8>,
    pub winner_votes: usize,
    pub total_votes: usize,
    pub called: bool,
}

impl ColumnCall {
    pub fn support(&self) -> f64 {
        if self.total_votes == 0 {
            0.0
        } else {
            self.winner_votes as f64 / self.total_votes as f64
        }
    }

    // Phred-scaled confidence in the plurality symbol.
    pub fn phred(&self) -> f64 {
        if self.total_votes == 0 {
            return 0.0;
        }
        let p_err = 1.0 - self.support();
        if p_err <= 0.0 {
            MAX_PHRED
        } else {
            (-10.0 * p_err.log10()).min(MAX_PHRED)
        }
    }
}

pub fn call_column<I>(symbols: I, params: &ConsensusParams) -> ColumnCall
where
    I: IntoIterator<Item = u8>,
{
    let counts = symbols
        .into_iter()
        .filter(|&s| params.quality_filter.passes(s))
        .map(|s| if s == b'.' { GAP } else { s.to_ascii_uppercase() })
        .counts();
    let total_votes: usize = counts.values().sum();

    // Ties go to the lowest symbol.
    let best = counts
        .into_iter()
        .max_by_key(|&(symbol, n)| (n, Reverse(symbol)));

    match best {
        None => ColumnCall {
            symbol: params.ambiguity,
            winner: None,
            winner_votes: 0,
            total_votes: 0,
            called: false,
        },
        Some((winner, winner_votes)) => {
            let called = winner_votes as f64 * 100.0 >= params.threshold * total_votes as f64;
            let symbol = match (called, params.low_support) {
                (true, _) => winner,
                (false, LowSupport::Ambiguity) => params.ambiguity,
                (false, LowSupport::Lowercase) => winner.to_ascii_lowercase(),
            };
            ColumnCall {
                symbol,
                winner: Some(winner),
                winner_votes,
                total_votes,
                called,
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Consensus {
    columns: Vec<ColumnCall>,
}

impl Consensus {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnCall] {
        &self.columns
    }

    pub fn sequence(&self) -> String {
        self.columns.iter().map(|c| c.symbol as char).collect()
    }

    pub fn num_uncalled(&self) -> usize {
        self.columns.iter().filter(|c| !c.called).count()
    }

    pub fn mean_phred(&self) -> f64 {
        if self.columns.is_empty() {
            return 0.0;
        }
        self.columns.iter().map(|c| c.phred()).sum::<f64>() / self.columns.len() as f64
    }
}

impl fmt::Display for Consensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sequence())
    }
}

pub fn consensus(aln: &Alignment, params: &ConsensusParams) -> Result<Consensus, SeqconsError> {
    params.validate()?;
    if aln.num_seq() == 0 {
        return Err(SeqconsError::Alignment(String::from(
            "Cannot compute the consensus of an empty alignment",
        )));
    }
    let columns: Vec<ColumnCall> = (0..aln.aln_len())
        .map(|j| call_column(aln.column(j), params))
        .collect();
    for (j, c) in columns.iter().enumerate().filter(|(_, c)| !c.called) {
        debug!(
            "column {}: {:?} has {}/{} votes, below {}%",
            j + 1,
            c.winner.map(char::from),
            c.winner_votes,
            c.total_votes,
            params.threshold
        );
    }
    let cons = Consensus { columns };
    info!(
        "Consensus: {} columns, {} not called at {}%",
        cons.len(),
        cons.num_uncalled(),
        params.threshold
    );
    Ok(cons)
}

// Percent of columns where `sequence` has the consensus symbol (case-insensitive).
pub fn pct_identity(sequence: &str, consensus: &str) -> f64 {
    if consensus.is_empty() {
        return 0.0;
    }
    let matches = sequence
        .bytes()
        .zip(consensus.bytes())
        .filter(|(s, c)| s.eq_ignore_ascii_case(c))
        .count();
    100.0 * matches as f64 / consensus.len() as f64
}
