//! Netlist parser.
//!
//! The netlist format is line-oriented, one component per line, with
//! whitespace-separated fields.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist     = { line }
//! line        = comment | component | empty
//! comment     = '*' { any_char }          (first non-blank character)
//! component   = identifier { field } [ ';' { any_char } ]
//! node        = digit+ | "GND"
//! value       = number [unit_suffix]
//!
//! number      = ['-'|'+'] digit+ ['.' digit+] [('e'|'E') ['-'|'+'] digit+]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! # Component Types
//!
//! The first character of the identifier selects the kind.
//!
//! | Type | Description | Syntax |
//! |------|-------------|--------|
//! | R | Resistor | `R<id> <n+> <n-> <ohms>` |
//! | L | Inductor | `L<id> <n+> <n-> <henries>` |
//! | C | Capacitor | `C<id> <n+> <n-> <farads>` |
//! | V | Voltage Source | `V<id> <n+> <n-> <magnitude> <phase_deg> <frequency>` |
//! | I | Current Source | `I<id> <n+> <n-> <magnitude> <phase_deg> <frequency>` |
//! | G | VCCS | `G<id> <n+> <n-> <nc+> <nc-> <gain>` |
//! | E | VCVS | `E<id> <n+> <n-> <nc+> <nc-> <gain>` |
//! | F | CCCS | `F<id> <n+> <n-> <sensor_id> <gain>` |
//! | H | CCVS | `H<id> <n+> <n-> <sensor_id> <gain>` |
//!
//! # Example
//!
//! ```text
//! * Series RL driven from the mains
//! V1 1 0 120 0 60
//! R1 1 2 3
//! L1 2 0 10.61m
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::components::Netlist;
use crate::error::Result;

/// Parse netlist text into an ordered list of typed components.
pub fn parse(input: &str) -> Result<Netlist> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    let ast = parser.parse()?;
    Netlist::from_ast(ast)
}

/// Parse a netlist file.
pub fn parse_file(path: &std::path::Path) -> Result<Netlist> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::PhasorError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
