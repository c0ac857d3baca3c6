// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use seqcons::errors::SeqconsError;

fn main() -> Result<(), SeqconsError> {
    seqcons::run()
}
