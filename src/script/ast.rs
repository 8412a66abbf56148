//! Abstract Syntax Tree types for the command script.

use crate::elements::ElementParams;
use crate::scheme::Position;

/// A parsed script: commands in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub statements: Vec<Statement>,
}

impl Script {
    /// Whether any statement asks for a run.
    pub fn has_run(&self) -> bool {
        self.statements
            .iter()
            .any(|s| matches!(s.command, Command::Run))
    }
}

/// A command together with the line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub command: Command,
    /// Source line number for error reporting
    pub line: usize,
}

/// The endpoints of a connection as written in a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub source: String,
    pub output_label: String,
    pub destination: String,
    pub input_label: String,
}

/// One script command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `add <type> <id> <x> <y> [name=value ...]`
    Add {
        element_type: String,
        id: String,
        position: Position,
        params: ElementParams,
    },
    /// `del <id>`
    Delete { id: String },
    /// `<out> <source> --> <in> <destination>`
    Connect(Link),
    /// `<out> <source> -!> <in> <destination>`
    Disconnect(Link),
    /// `move <id> <x> <y>`
    Move { id: String, position: Position },
    /// `switch <id>`
    Switch { id: String },
    /// `enable <id>`
    SwitchEnable { id: String },
    /// `clear`
    Clear,
    /// `run`
    Run,
}
