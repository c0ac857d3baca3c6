// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{fmt, io::Write};

use clap::ValueEnum;
use serde::Serialize;

use crate::{
    alignment::Alignment,
    app::SeqOrdering::{MetricDecr, MetricIncr, SourceFile},
    consensus::{consensus, pct_identity, Consensus, ConsensusParams},
    errors::SeqconsError,
    seq::fasta::write_fasta,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SeqOrdering {
    #[clap(name = "source")]
    SourceFile,
    #[clap(name = "id-incr")]
    MetricIncr,
    #[clap(name = "id-decr")]
    MetricDecr,
}

impl fmt::Display for SeqOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sord = match self {
            SourceFile => '-',
            MetricIncr => '↑',
            MetricDecr => '↓',
        };
        write!(f, "{}", sord)
    }
}

#[derive(Debug, Serialize)]
pub struct SeqReport {
    pub header: String,
    pub pct_id_wrt_consensus: f64,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub name: String,
    pub nb_sequences: usize,
    pub nb_columns: usize,
    pub nb_ambiguous: usize,
    pub threshold: f64,
    pub mean_phred: f64,
    pub consensus: String,
    pub sequences: Vec<SeqReport>,
}

pub struct App {
    pub filename: String,
    pub alignment: Alignment,
    pub consensus: Consensus,
    params: ConsensusParams,
    ordering_criterion: SeqOrdering,
    // Order in which the sequences are reported. The elements of this Vec are _indices_ into the
    // Vec's of headers and sequences that together make up the alignment.
    pub ordering: Vec<usize>,
    // %id of each sequence WRT the consensus, in source order
    pub id_wrt_consensus: Vec<f64>,
}

impl App {
    pub fn new(
        path: &str,
        alignment: Alignment,
        params: ConsensusParams,
    ) -> Result<Self, SeqconsError> {
        let cons = consensus(&alignment, &params)?;
        let cons_seq = cons.sequence();
        let id_wrt_consensus = alignment
            .sequences()
            .iter()
            .map(|s| pct_identity(s, &cons_seq))
            .collect();
        let len = alignment.num_seq();
        Ok(App {
            filename: path.to_string(),
            alignment,
            consensus: cons,
            params,
            ordering_criterion: SourceFile,
            ordering: (0..len).collect(),
            id_wrt_consensus,
        })
    }

    pub fn num_seq(&self) -> usize {
        self.alignment.num_seq()
    }

    pub fn aln_len(&self) -> usize {
        self.alignment.aln_len()
    }

    pub fn get_seq_ordering(&self) -> SeqOrdering {
        self.ordering_criterion
    }

    pub fn set_seq_ordering(&mut self, criterion: SeqOrdering) {
        self.ordering_criterion = criterion;
        self.recompute_ordering();
    }

    fn recompute_ordering(&mut self) {
        match self.ordering_criterion {
            MetricIncr => {
                self.ordering = order(&self.id_wrt_consensus);
            }
            MetricDecr => {
                let mut ord = order(&self.id_wrt_consensus);
                ord.reverse();
                self.ordering = ord;
            }
            SourceFile => {
                self.ordering = (0..self.alignment.num_seq()).collect();
            }
        }
    }

    pub fn write_consensus<W: Write>(
        &self,
        writer: &mut W,
        name: &str,
        width: usize,
    ) -> Result<(), SeqconsError> {
        write_fasta(writer, name, &self.consensus.sequence(), width)
    }

    pub fn report(&self) -> Report {
        Report {
            name: self.filename.clone(),
            nb_sequences: self.num_seq(),
            nb_columns: self.aln_len(),
            nb_ambiguous: self.consensus.num_uncalled(),
            threshold: self.params.threshold,
            mean_phred: self.consensus.mean_phred(),
            consensus: self.consensus.sequence(),
            sequences: self
                .ordering
                .iter()
                .map(|&i| SeqReport {
                    header: self.alignment.headers()[i].clone(),
                    pct_id_wrt_consensus: self.id_wrt_consensus[i],
                })
                .collect(),
        }
    }

    pub fn output_info<W: Write>(&self, writer: &mut W) -> Result<(), SeqconsError> {
        let report = self.report();
        writeln!(writer, "name: {}", report.name)?;
        writeln!(writer, "nb_sequences: {}", report.nb_sequences)?;
        writeln!(writer, "nb_columns: {}", report.nb_columns)?;
        writeln!(writer, "nb_ambiguous: {}", report.nb_ambiguous)?;
        writeln!(writer, "threshold: {}%", report.threshold)?;
        writeln!(writer, "mean_phred: {:.1}", report.mean_phred)?;
        writeln!(writer, "ordering: {}", self.ordering_criterion)?;
        for seq in &report.sequences {
            writeln!(writer, "{:6.2}\t{}", seq.pct_id_wrt_consensus, seq.header)?;
        }
        Ok(())
    }

    pub fn output_json<W: Write>(&self, writer: &mut W) -> Result<(), SeqconsError> {
        serde_json::to_writer_pretty(&mut *writer, &self.report())?;
        writeln!(writer)?;
        Ok(())
    }
}

// Computes an ordering WRT an array, that is, an array of indices of elements of the source array,
// after sorting. Eg [3, -2, 7] -> [1, 0, 2], because the smalllest element has index 1, the next
// has index 0, and the largest has index 2 (in the original array). The sort is stable.
fn order(nums: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..nums.len()).collect();
    indices.sort_by(|&i, &j| nums[i].total_cmp(&nums[j]));
    indices
}
