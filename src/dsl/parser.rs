//! Parser for netlist text.

use std::collections::HashSet;

use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};
use crate::error::{PhasorError, Result};

/// Parser for netlist text.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let current = lexer.next_token();
        Self { lexer, current }
    }

    /// Parse the entire netlist.
    pub fn parse(&mut self) -> Result<NetlistAst> {
        let mut ast = NetlistAst::new();
        let mut names = HashSet::new();

        while self.current.kind != TokenKind::Eof {
            // Skip empty lines
            if self.current.kind == TokenKind::Newline {
                self.advance();
                continue;
            }

            let component = self.parse_component()?;
            if !names.insert(component.name.clone()) {
                return Err(PhasorError::DuplicateComponent {
                    name: component.name,
                    line: component.line,
                });
            }
            ast.components.push(component);
        }

        Ok(ast)
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn parse_component(&mut self) -> Result<ComponentDef> {
        let name = self.current.text.clone();
        let line = self.current.line;
        self.advance();

        let first_char = name.chars().next().unwrap_or('?');
        let component_type = ComponentType::from_prefix(first_char).ok_or_else(|| {
            PhasorError::UnknownComponentType {
                component_type: name.clone(),
                line,
            }
        })?;

        let mut tokens = Vec::with_capacity(component_type.arity());
        while self.current.kind == TokenKind::Word {
            tokens.push(self.current.clone());
            self.advance();
        }

        let expected = component_type.field_names();
        if tokens.len() != expected.len() {
            let problem = if tokens.len() < expected.len() {
                format!("missing field '{}'", expected[tokens.len()])
            } else {
                let extra = &tokens[expected.len()];
                format!(
                    "unexpected extra field '{}' at column {}",
                    extra.text, extra.column
                )
            };
            return Err(PhasorError::parse(
                line,
                format!(
                    "{} '{}': {} (expected: {} {})",
                    component_type.label(),
                    name,
                    problem,
                    name,
                    expected.join(" ")
                ),
            ));
        }

        Ok(ComponentDef {
            component_type,
            name,
            fields: tokens.into_iter().map(|t| t.text).collect(),
            line,
        })
    }
}
