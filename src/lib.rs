// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

pub mod aligner;
pub mod alignment;
pub mod app;
pub mod config;
pub mod consensus;
pub mod errors;
pub mod hex;
pub mod runner;
pub mod seq;

use crate::errors::SeqconsError;

pub fn run() -> Result<(), SeqconsError> {
    runner::run()
}

pub fn run_hexdump() -> Result<(), SeqconsError> {
    runner::run_hexdump()
}
