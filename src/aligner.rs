// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::{
    fmt, fs,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};

use clap::ValueEnum;
use log::{debug, info};

use crate::errors::SeqconsError;

// Turns FastA text into aligned FastA text.
pub trait Aligner {
    fn align(&self, fasta: &str) -> Result<String, SeqconsError>;
}

impl<F> Aligner for F
where
    F: Fn(&str) -> Result<String, SeqconsError>,
{
    fn align(&self, fasta: &str) -> Result<String, SeqconsError> {
        self(fasta)
    }
}

// For input that is already aligned.
pub struct Passthrough;

impl Aligner for Passthrough {
    fn align(&self, fasta: &str) -> Result<String, SeqconsError> {
        Ok(fasta.to_string())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum AlignerTool {
    #[clap(name = "muscle")]
    #[clap(alias = "m")]
    Muscle,
    #[clap(name = "mafft")]
    #[clap(alias = "f")]
    Mafft,
    #[clap(name = "none")]
    #[clap(alias = "n")]
    Skip,
}

impl fmt::Display for AlignerTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlignerTool::Muscle => "muscle",
            AlignerTool::Mafft => "mafft",
            AlignerTool::Skip => "none",
        };
        write!(f, "{}", s)
    }
}

// mafft lower-cases its output unless told otherwise, and lower case means "low quality" to the
// consensus.
const MAFFT_ARGS: &[&str] = &["--quiet", "--auto", "--preservecase", "-"];

impl AlignerTool {
    fn executable(&self) -> Option<&'static str> {
        match self {
            AlignerTool::Muscle => Some("muscle"),
            AlignerTool::Mafft => Some("mafft"),
            AlignerTool::Skip => None,
        }
    }
}

// Runs an external MSA program as a child process. Without a bin_dir, the program is looked up
// in PATH.
pub struct ExternalAligner {
    pub tool: AlignerTool,
    pub bin_dir: Option<PathBuf>,
}

impl ExternalAligner {
    pub fn new(tool: AlignerTool, bin_dir: Option<PathBuf>) -> Self {
        ExternalAligner { tool, bin_dir }
    }

    pub fn program(&self) -> Option<PathBuf> {
        let exe = self.tool.executable()?;
        Some(match &self.bin_dir {
            Some(dir) => dir.join(exe),
            None => PathBuf::from(exe),
        })
    }
}

impl Aligner for ExternalAligner {
    fn align(&self, fasta: &str) -> Result<String, SeqconsError> {
        let Some(program) = self.program() else {
            return Passthrough.align(fasta);
        };
        match self.tool {
            AlignerTool::Muscle => run_muscle(&program, fasta),
            AlignerTool::Mafft => run_filter(&program, MAFFT_ARGS, fasta),
            AlignerTool::Skip => Passthrough.align(fasta),
        }
    }
}

static TMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn tmp_path(stem: &str, suffix: &str) -> PathBuf {
    let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut path = std::env::temp_dir();
    path.push(format!("seqcons-{}-{}-{}.{}", stem, std::process::id(), n, suffix));
    path
}

// MUSCLE v5 only works on files: `muscle -align <in> -output <out>`.
pub fn run_muscle(program: &Path, input: &str) -> Result<String, SeqconsError> {
    let input_tmp = tmp_path("muscle", "in.fa");
    let output_path = tmp_path("muscle", "out.afa");
    let res = muscle_on_files(program, input, &input_tmp, &output_path);
    fs::remove_file(&input_tmp).ok();
    fs::remove_file(&output_path).ok();
    res
}

fn muscle_on_files(
    program: &Path,
    input: &str,
    input_tmp: &Path,
    output_path: &Path,
) -> Result<String, SeqconsError> {
    fs::write(input_tmp, input)?;
    info!(
        "Running {} -align {} -output {}",
        program.display(),
        input_tmp.display(),
        output_path.display()
    );
    let status = Command::new(program)
        .arg("-align")
        .arg(input_tmp)
        .arg("-output")
        .arg(output_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| {
            SeqconsError::Aligner(format!("Failed to run {}: {}", program.display(), e))
        })?;
    if !status.success() {
        return Err(SeqconsError::Aligner(format!(
            "{} failed ({})",
            program.display(),
            status
        )));
    }
    let aligned = fs::read(output_path).map_err(|e| {
        SeqconsError::Aligner(format!(
            "{} wrote no output to {}: {}",
            program.display(),
            output_path.display(),
            e
        ))
    })?;
    debug!("{} wrote {} bytes", program.display(), aligned.len());
    String::from_utf8(aligned)
        .map_err(|e| SeqconsError::Aligner(format!("Aligner output is not UTF-8: {}", e)))
}

// Pipes `input` through `program args...` and returns its stdout. stdin is fed from a separate
// thread so that a child filling its stdout pipe cannot block us.
pub fn run_filter(program: &Path, args: &[&str], input: &str) -> Result<String, SeqconsError> {
    info!("Running {} {}", program.display(), args.join(" "));
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| {
            SeqconsError::Aligner(format!("Failed to run {}: {}", program.display(), e))
        })?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| SeqconsError::Aligner(String::from("Could not open aligner stdin")))?;
    let input = input.to_string();
    let feeder = thread::spawn(move || stdin.write_all(input.as_bytes()));

    let output = child.wait_with_output()?;
    let fed = feeder.join();

    if !output.status.success() {
        return Err(SeqconsError::Aligner(format!(
            "{} failed ({})",
            program.display(),
            output.status
        )));
    }
    match fed {
        Ok(res) => res?,
        Err(_) => {
            return Err(SeqconsError::Aligner(String::from(
                "Aligner input thread panicked",
            )))
        }
    }
    debug!("{} wrote {} bytes", program.display(), output.stdout.len());
    String::from_utf8(output.stdout)
        .map_err(|e| SeqconsError::Aligner(format!("Aligner output is not UTF-8: {}", e)))
}
