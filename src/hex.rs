// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::{
    fs::File,
    io::{self, Read},
    path::Path,
    sync::OnceLock,
};

use itertools::Itertools;
use regex::Regex;

use crate::errors::SeqconsError;

// "0x00 0xff 0x10": lower-case, two digits per byte, single spaces.
pub fn format_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:#04x}", b)).join(" ")
}

fn hex_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0[xX]([0-9a-fA-F]{1,2})$").expect("valid hex token regex"))
}

// Inverse of format_hex(); any whitespace may separate the tokens.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, SeqconsError> {
    let re = hex_token_re();
    text.split_whitespace()
        .enumerate()
        .map(|(i, token)| {
            let digits = re
                .captures(token)
                .and_then(|caps| caps.get(1))
                .ok_or_else(|| {
                    SeqconsError::Format(format!("Bad hex byte #{}: '{}'", i + 1, token))
                })?;
            u8::from_str_radix(digits.as_str(), 16)
                .map_err(|e| SeqconsError::Format(format!("Bad hex byte '{}': {}", token, e)))
        })
        .collect()
}

// Whole-file read; "-" is stdin.
pub fn read_all<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, SeqconsError> {
    let path = path.as_ref();
    let mut buf = Vec::new();
    if path == Path::new("-") {
        io::stdin().lock().read_to_end(&mut buf)?;
    } else {
        File::open(path)?.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(&[0x00, 0xFF, 0x10]), "0x00 0xff 0x10");
    }

    #[test]
    fn test_format_hex_empty() {
        assert_eq!(format_hex(&[]), "");
    }

    #[test]
    fn test_format_hex_length() {
        for n in 1..64 {
            let bytes: Vec<u8> = (0..n).map(|i| (i * 37) as u8).collect();
            assert_eq!(format_hex(&bytes).len(), 5 * n - 1);
        }
    }

    #[test]
    fn test_round_trip_all_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(parse_hex(&format_hex(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn test_parse_hex_lenient() {
        assert_eq!(parse_hex("0xA\n0X0b\t0xff  ").unwrap(), vec![0x0a, 0x0b, 0xff]);
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(matches!(parse_hex("0x00 ff"), Err(SeqconsError::Format(_))));
        assert!(matches!(parse_hex("0x100"), Err(SeqconsError::Format(_))));
        assert!(matches!(parse_hex("0xgg"), Err(SeqconsError::Format(_))));
    }

    #[test]
    fn test_read_all_missing_file() {
        assert!(matches!(
            read_all("data/no-such-file.bin"),
            Err(SeqconsError::Io(_))
        ));
    }

    #[test]
    fn test_read_all() {
        let bytes = read_all("data/test1.fas").unwrap();
        assert_eq!(bytes, b">seq1\nGAATTC\n".to_vec());
    }
}
