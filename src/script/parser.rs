//! Parser for the command script.

use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};
use crate::elements::ElementParams;
use crate::error::{Result, SchemeError};
use crate::scheme::Position;

/// Parser for command scripts.
///
/// The grammar is one command per line, so the parser gathers a line of
/// tokens and then decides what command it is.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self { lexer }
    }

    /// Parse the whole script.
    pub fn parse(&mut self) -> Result<Script> {
        let mut script = Script::default();
        loop {
            let (tokens, at_eof) = self.next_line()?;
            if let Some(first) = tokens.first() {
                let line = first.line;
                let command = parse_command(&tokens)?;
                script.statements.push(Statement { command, line });
            }
            if at_eof {
                return Ok(script);
            }
        }
    }

    /// Tokens up to the next newline, and whether input ended.
    fn next_line(&mut self) -> Result<(Vec<Token>, bool)> {
        let mut tokens = Vec::new();
        loop {
            let token = self.lexer.next_token()?;
            match token.kind {
                TokenKind::Newline => return Ok((tokens, false)),
                TokenKind::Eof => return Ok((tokens, true)),
                _ => tokens.push(token),
            }
        }
    }
}

fn parse_command(tokens: &[Token]) -> Result<Command> {
    let line = tokens[0].line;

    if let Some(arrow) = tokens.get(2) {
        if matches!(arrow.kind, TokenKind::Arrow | TokenKind::BrokenArrow) {
            return parse_link(tokens, arrow.kind);
        }
    }

    let keyword = word(&tokens[0])?.to_lowercase();
    let mut rest = Cursor {
        tokens: &tokens[1..],
        line,
    };
    let command = match keyword.as_str() {
        "add" => {
            let element_type = rest.name("element type")?;
            let id = rest.name("element id")?;
            let position = rest.position()?;
            let mut params = ElementParams::new();
            while !rest.is_empty() {
                let (name, value) = rest.param()?;
                params.insert(name, value);
            }
            Command::Add {
                element_type,
                id,
                position,
                params,
            }
        }
        "del" | "delete" => Command::Delete {
            id: rest.name("element id")?,
        },
        "move" => Command::Move {
            id: rest.name("element id")?,
            position: rest.position()?,
        },
        "switch" => Command::Switch {
            id: rest.name("element id")?,
        },
        "enable" => Command::SwitchEnable {
            id: rest.name("element id")?,
        },
        "clear" => Command::Clear,
        "run" => Command::Run,
        _ => {
            return Err(SchemeError::parse(
                line,
                format!("unknown command: {}", tokens[0].text),
            ))
        }
    };
    rest.finish()?;
    Ok(command)
}

fn parse_link(tokens: &[Token], arrow: TokenKind) -> Result<Command> {
    let line = tokens[0].line;
    if tokens.len() != 5 {
        return Err(SchemeError::parse(
            line,
            "expected '<out> <source> --> <in> <destination>'",
        ));
    }
    let link = Link {
        output_label: word(&tokens[0])?,
        source: name(&tokens[1])?,
        input_label: word(&tokens[3])?,
        destination: name(&tokens[4])?,
    };
    Ok(match arrow {
        TokenKind::Arrow => Command::Connect(link),
        _ => Command::Disconnect(link),
    })
}

/// Pin labels and keywords must be words.
fn word(token: &Token) -> Result<String> {
    if token.kind == TokenKind::Word {
        Ok(token.text.clone())
    } else {
        Err(SchemeError::parse(
            token.line,
            format!("expected a name, got {:?}", token.text),
        ))
    }
}

/// Element ids may also be plain numbers.
fn name(token: &Token) -> Result<String> {
    match token.kind {
        TokenKind::Word | TokenKind::Number => Ok(token.text.clone()),
        _ => Err(SchemeError::parse(
            token.line,
            format!("expected an element id, got {:?}", token.text),
        )),
    }
}

/// Sequential reader over the arguments of one command.
struct Cursor<'t> {
    tokens: &'t [Token],
    line: usize,
}

impl<'t> Cursor<'t> {
    fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn next(&mut self, what: &str) -> Result<&'t Token> {
        let tokens = self.tokens;
        let (first, rest) = tokens
            .split_first()
            .ok_or_else(|| SchemeError::parse(self.line, format!("missing {}", what)))?;
        self.tokens = rest;
        Ok(first)
    }

    fn name(&mut self, what: &str) -> Result<String> {
        name(self.next(what)?)
    }

    fn number(&mut self, what: &str) -> Result<f64> {
        let token = self.next(what)?;
        match token.kind {
            TokenKind::Number => token
                .text
                .parse()
                .map_err(|_| SchemeError::parse(self.line, format!("invalid number: {}", token.text))),
            _ => Err(SchemeError::parse(
                self.line,
                format!("expected {}, got {:?}", what, token.text),
            )),
        }
    }

    fn position(&mut self) -> Result<Position> {
        let x = self.number("x coordinate")?;
        let y = self.number("y coordinate")?;
        Ok(Position::new(x, y))
    }

    /// `name=value` with a non-negative integer value.
    fn param(&mut self) -> Result<(String, u32)> {
        let name = word(self.next("parameter name")?)?;
        let equals = self.next("'='")?;
        if equals.kind != TokenKind::Equals {
            return Err(SchemeError::parse(
                self.line,
                format!("expected '=' after {}", name),
            ));
        }
        let token = self.next("parameter value")?;
        let value = token.text.parse::<u32>().map_err(|_| {
            SchemeError::parse(
                self.line,
                format!("parameter {} needs a non-negative integer, got {}", name, token.text),
            )
        })?;
        Ok((name, value))
    }

    fn finish(&self) -> Result<()> {
        match self.tokens.first() {
            Some(extra) => Err(SchemeError::parse(
                self.line,
                format!("unexpected token: {:?}", extra.text),
            )),
            None => Ok(()),
        }
    }
}
