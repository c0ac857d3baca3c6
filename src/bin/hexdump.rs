// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use seqcons::errors::SeqconsError;

fn main() -> Result<(), SeqconsError> {
    seqcons::run_hexdump()
}
