// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::io::{stdin, stdout, Write};

use clap::Parser;
use log::info;

use crate::aligner::{Aligner, AlignerTool, ExternalAligner};
use crate::alignment::Alignment;
use crate::app::{App, SeqOrdering};
use crate::config::SeqconsConfig;
use crate::consensus::{
    ConsensusParams, LowSupport, QualityFilter, DEFAULT_AMBIGUITY, DEFAULT_THRESHOLD,
};
use crate::errors::SeqconsError;
use crate::hex::{format_hex, read_all};
use crate::seq::fasta::{read_fasta, read_fasta_file, read_fasta_str, to_fasta_string};
use crate::seq::file::SeqFile;

const DEFAULT_CONSENSUS_NAME: &str = "consensus";

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Align sequences with an external tool and print their consensus",
    long_about = None
)]
struct Cli {
    /// Sequence file (FastA); stdin if absent or '-'
    input: Option<String>,

    /// External aligner
    #[arg(short, long, default_value_t = AlignerTool::Muscle,
        help = "Aligner [muscle (v5)|mafft|none] (or just m|f|n); default: muscle",
        hide_default_value = true,
        hide_possible_values = true,
    )]
    aligner: AlignerTool,

    /// Minimum share of votes [%] for a column to be called (default: 50, or from config)
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Symbol for columns that cannot be called (default: N, or from config)
    #[arg(short = 'n', long)]
    ambiguity: Option<char>,

    /// Let lower-case (low-quality) symbols vote
    #[arg(long = "no-quality-filter")]
    no_quality_filter: bool,

    /// Print poorly supported columns as the lower-case plurality symbol instead of the ambiguity
    /// symbol
    #[arg(long = "lowercase-low-support")]
    lowercase_low_support: bool,

    /// Consensus line width (0: single line)
    #[arg(short = 'w', long = "line-width", default_value_t = 60)]
    line_width: usize,

    /// Header of the consensus record (default: ID of the first input sequence)
    #[arg(long)]
    name: Option<String>,

    /// Info mode: print alignment and consensus statistics instead of the consensus
    #[arg(short, long)]
    info: bool,

    /// Like --info, but as JSON
    #[arg(long, conflicts_with = "info")]
    json: bool,

    /// Order of sequences in info mode
    #[arg(short, long, default_value = "source")]
    order: SeqOrdering,
}

impl Cli {
    fn consensus_params(&self, config: &SeqconsConfig) -> Result<ConsensusParams, SeqconsError> {
        let threshold = self
            .threshold
            .or(config.consensus.threshold)
            .unwrap_or(DEFAULT_THRESHOLD);
        let ambiguity = match self.ambiguity.or(config.consensus.ambiguity) {
            Some(c) if c.is_ascii() => c as u8,
            Some(c) => {
                return Err(SeqconsError::Format(format!(
                    "Ambiguity symbol must be ASCII, got '{}'",
                    c
                )))
            }
            None => DEFAULT_AMBIGUITY,
        };
        let params = ConsensusParams {
            threshold,
            ambiguity,
            quality_filter: if self.no_quality_filter {
                QualityFilter::None
            } else {
                QualityFilter::Case
            },
            low_support: if self.lowercase_low_support {
                LowSupport::Lowercase
            } else {
                LowSupport::Ambiguity
            },
        };
        params.validate()?;
        Ok(params)
    }
}

fn read_input(input: Option<&str>) -> Result<SeqFile, SeqconsError> {
    match input {
        None | Some("-") => read_fasta(stdin().lock()),
        Some(path) => read_fasta_file(path),
    }
}

// The consensus is named after the first input record unless a name is given.
fn consensus_name(name: Option<&str>, seq_file: &SeqFile) -> String {
    match name {
        Some(name) => name.to_string(),
        None => seq_file
            .first()
            .map(|rec| rec.id())
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_CONSENSUS_NAME)
            .to_string(),
    }
}

// Sends the records through the aligner and reads back the alignment set.
pub fn align_records(seq_file: &SeqFile, aligner: &dyn Aligner) -> Result<Alignment, SeqconsError> {
    let aligned = aligner.align(&to_fasta_string(seq_file)?)?;
    let aligned = read_fasta_str(&aligned)?;
    Alignment::from_file(aligned)
}

pub fn run() -> Result<(), SeqconsError> {
    env_logger::init();
    info!("Starting log");

    let cli = Cli::parse();
    let config = SeqconsConfig::load()?;
    let params = cli.consensus_params(&config)?;

    let input_name = cli.input.as_deref().unwrap_or("-");
    let seq_file = read_input(cli.input.as_deref())?;
    info!("Read {} sequences from {}", seq_file.len(), input_name);

    let name = consensus_name(cli.name.as_deref(), &seq_file);

    let aligner = ExternalAligner::new(cli.aligner, config.tools.bin_dir(cli.aligner));
    let alignment = align_records(&seq_file, &aligner)?;
    info!(
        "Aligned {} sequences over {} columns",
        alignment.num_seq(),
        alignment.aln_len()
    );

    let mut app = App::new(input_name, alignment, params)?;
    app.set_seq_ordering(cli.order);

    // Render everything first: nothing reaches stdout unless the whole run succeeded.
    let mut out: Vec<u8> = Vec::new();
    if cli.info {
        app.output_info(&mut out)?;
    } else if cli.json {
        app.output_json(&mut out)?;
    } else {
        app.write_consensus(&mut out, &name, cli.line_width)?;
    }
    let mut stdout = stdout().lock();
    stdout.write_all(&out)?;
    stdout.flush()?;

    Ok(())
}

#[derive(Debug, Parser)]
#[command(version, about = "Print the bytes of a file in hexadecimal", long_about = None) ]
struct HexCli {
    /// File to dump ('-' for stdin)
    file: String,
}

pub fn run_hexdump() -> Result<(), SeqconsError> {
    env_logger::init();

    let cli = HexCli::parse();
    let bytes = read_all(&cli.file)?;
    info!("Read {} bytes from {}", bytes.len(), cli.file);

    let mut stdout = stdout().lock();
    writeln!(stdout, "{}", format_hex(&bytes))?;
    stdout.flush()?;

    Ok(())
}
