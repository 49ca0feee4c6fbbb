//! Field extraction for reference (nestest.log) lines.
//!
//! Reference lines look like
//! `C000  4C F5 C5  JMP $C5F5          A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7`
//! and are read purely by whitespace tokens. The program counter and opcode
//! are positional, everything else is found by scanning.

use std::fmt;

use super::{StatusFlags, TraceLine};
use crate::error::ExtractError;

/// Prefix nestest puts on undocumented opcodes, e.g. `*NOP`.
pub const UNOFFICIAL_MARKER: char = '*';

/// Length of the `CYC:` label in front of the cycle counter.
const CYCLE_PREFIX_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    A,
    X,
    Y,
    P,
}

impl Register {
    fn label(self) -> &'static str {
        match self {
            Register::A => "A:",
            Register::X => "X:",
            Register::Y => "Y:",
            Register::P => "P:",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Register::A => "A",
            Register::X => "X",
            Register::Y => "Y",
            Register::P => "P",
        };
        write!(f, "{}", name)
    }
}

/// A token is taken as the mnemonic when it is exactly three characters
/// long, or four characters starting with [`UNOFFICIAL_MARKER`].
pub fn is_mnemonic_token(token: &str) -> bool {
    let len = token.chars().count();
    len == 3 || (len == 4 && token.starts_with(UNOFFICIAL_MARKER))
}

/// First token satisfying [`is_mnemonic_token`].
pub fn find_mnemonic<'a>(tokens: &[&'a str]) -> Result<&'a str, ExtractError> {
    tokens
        .iter()
        .copied()
        .find(|t| is_mnemonic_token(t))
        .ok_or(ExtractError::MissingMnemonicToken)
}

pub fn find_register(tokens: &[&str], reg: Register) -> Result<u8, ExtractError> {
    let value = tokens
        .iter()
        .find_map(|t| t.strip_prefix(reg.label()))
        .ok_or(ExtractError::MissingRegister(reg))?;
    parse_hex_u8("register", value)
}

pub fn find_stack_pointer(tokens: &[&str]) -> Result<u8, ExtractError> {
    let value = tokens
        .iter()
        .find_map(|t| t.strip_prefix("SP:"))
        .ok_or(ExtractError::MissingStackPointer)?;
    parse_hex_u8("stack pointer", value)
}

/// The last token minus its four-character label, read as decimal.
pub fn cycle_count(tokens: &[&str]) -> Result<u64, ExtractError> {
    let token = tokens.last().ok_or(ExtractError::MissingField("cycle count"))?;
    let digits = token
        .char_indices()
        .nth(CYCLE_PREFIX_LEN)
        .map_or("", |(i, _)| &token[i..]);
    digits
        .parse()
        .map_err(|source| ExtractError::MalformedCycleCount {
            token: token.to_string(),
            source,
        })
}

fn parse_hex_u8(field: &'static str, token: &str) -> Result<u8, ExtractError> {
    u8::from_str_radix(token, 16).map_err(|_| ExtractError::MalformedHex {
        field,
        token: token.to_string(),
    })
}

impl TraceLine {
    /// Extract every field of one reference line. Any missing or
    /// unparseable field fails the whole line.
    pub fn from_reference_line(line: &str) -> Result<Self, ExtractError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let pc_token = tokens
            .first()
            .ok_or(ExtractError::MissingField("program counter"))?;
        let pc = u16::from_str_radix(pc_token, 16).map_err(|_| ExtractError::MalformedHex {
            field: "program counter",
            token: pc_token.to_string(),
        })?;

        let mnemonic = find_mnemonic(&tokens)?;

        let opcode_token = tokens.get(1).ok_or(ExtractError::MissingField("opcode"))?;
        let opcode = parse_hex_u8("opcode", opcode_token)?;

        let a = find_register(&tokens, Register::A)?;
        let x = find_register(&tokens, Register::X)?;
        let y = find_register(&tokens, Register::Y)?;
        let p = find_register(&tokens, Register::P)?;
        let sp = find_stack_pointer(&tokens)?;
        let cycles = cycle_count(&tokens)?;

        Ok(TraceLine {
            pc,
            mnemonic: mnemonic.to_string(),
            opcode,
            a,
            x,
            y,
            status: StatusFlags::from_bits_retain(p),
            sp,
            cycles,
        })
    }
}
