//! Line-oriented command script for building and running schemes.
//!
//! Each non-empty line is one command; `#` starts a comment.
//!
//! # Grammar Overview
//!
//! ```text
//! script   = { line }
//! line     = [ command ] [ comment ] newline
//! command  = add | del | connect | disconnect | move | switch | enable | "clear" | "run"
//! add      = "add" type id number number { param }
//! del      = "del" id
//! connect  = label id "-->" label id
//! disconnect = label id "-!>" label id
//! move     = "move" id number number
//! switch   = "switch" id
//! enable   = "enable" id
//! param    = name "=" integer
//! ```
//!
//! In a connection line the output label comes first, then its element,
//! then the input label and its element.
//!
//! # Example
//!
//! ```text
//! # A NOT gate fed by a constant, then an oscillator
//! add constant c1 0 0 value=1
//! add not n1 2 0
//! out c1 --> in n1
//! run
//! add not osc 0 2
//! out osc --> in osc
//! run
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use tracing::info;

use crate::engine::RunReport;
use crate::error::Result;
use crate::scheme::Scheme;

/// Parse a script string.
pub fn parse(input: &str) -> Result<Script> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    parser.parse()
}

/// Parse a script file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<Script> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::SchemeError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}

/// Apply a script to a scheme, returning one report per `run` command.
///
/// Execution stops at the first failing command; commands before it stay
/// applied.
pub fn execute(scheme: &mut Scheme, script: &Script) -> Result<Vec<RunReport>> {
    let mut reports = Vec::new();
    for statement in &script.statements {
        apply(scheme, &statement.command, &mut reports).map_err(|e| e.at_line(statement.line))?;
    }
    Ok(reports)
}

fn apply(scheme: &mut Scheme, command: &Command, reports: &mut Vec<RunReport>) -> Result<()> {
    match command {
        Command::Add {
            element_type,
            id,
            position,
            params,
        } => scheme.add_element(element_type, id, *position, params),
        Command::Delete { id } => scheme.delete_element(id),
        Command::Connect(link) => scheme.add_connection(
            &link.source,
            &link.output_label,
            &link.destination,
            &link.input_label,
        ),
        Command::Disconnect(link) => scheme.delete_connection(
            &link.source,
            &link.output_label,
            &link.destination,
            &link.input_label,
        ),
        Command::Move { id, position } => scheme.move_element(id, *position),
        Command::Switch { id } => scheme.switch(id),
        Command::SwitchEnable { id } => scheme.switch_enable(id),
        Command::Clear => {
            scheme.clear();
            Ok(())
        }
        Command::Run => {
            let report = scheme.run()?;
            info!(
                run = reports.len() + 1,
                period = report.period(),
                stable = report.is_stable(),
                "scheme evaluated"
            );
            reports.push(report);
            Ok(())
        }
    }
}
