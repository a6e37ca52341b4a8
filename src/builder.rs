//! Token-driven tree construction.
//!
//! [`TreeBuilder`] is the [`TokenHandler`] that turns the lexer's token
//! stream into a [`Node`] tree. It keeps the statement being read
//! (pending name, whether `=` was seen, the open value list) and a stack of
//! scopes opened with `{` and not yet closed.
//!
//! An open scope or value list is only attached to its container when it
//! closes. Nothing else can be appended to that container in the meantime,
//! so statement order is preserved.

use crate::lexer::{Lexer, TokenHandler};
use crate::token::{Token, TokenKind};
use crate::value::{parse_bool_flag, Collection, Identifier, Node, Value, ValueVariable};
use crate::{Error, Result};
use tracing::trace;

/// Builds a variable tree from tokens.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    root: Node,
    open_scopes: Vec<Node>,
    pending_name: Option<String>,
    equals_seen: bool,
    open_identifier: Option<Identifier>,
}

impl TreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lexes and builds `input` in one pass.
    ///
    /// # Errors
    ///
    /// Returns the first lexical, structural or hierarchy error.
    pub fn parse(input: &str) -> Result<Node> {
        let mut builder = TreeBuilder::new();
        Lexer::new(input).run(&mut builder)?;
        builder.finish()
    }

    /// Returns the finished root.
    ///
    /// # Errors
    ///
    /// Returns a hierarchy error if a scope is still open or the input
    /// stopped right after `=`.
    pub fn finish(mut self) -> Result<Node> {
        if self.equals_seen {
            return Err(Error::hierarchy("input ended after '=' with no value"));
        }
        self.finalize_statement();
        if let Some(scope) = self.open_scopes.last() {
            let name = if scope.name().is_empty() {
                "<anonymous>"
            } else {
                scope.name()
            };
            return Err(Error::hierarchy(&format!(
                "{} scope(s) never closed, innermost '{name}'",
                self.open_scopes.len()
            )));
        }
        Ok(self.root)
    }

    /// Depth of the scope currently being filled; zero at the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open_scopes.len()
    }

    fn current_mut(&mut self) -> &mut Node {
        self.open_scopes.last_mut().unwrap_or(&mut self.root)
    }

    fn literal_value(token: &Token) -> Result<Value> {
        let lexeme = token.lexeme();
        let value = match token.kind() {
            TokenKind::Number => Value::Int(lexeme.parse().map_err(|_| {
                Error::lexical(token.line(), token.column(), "integer literal out of range")
            })?),
            TokenKind::Double => Value::Float(lexeme.parse().map_err(|_| {
                Error::lexical(token.line(), token.column(), "invalid decimal literal")
            })?),
            TokenKind::String => match parse_bool_flag(lexeme) {
                Some(b) => Value::Bool(b),
                None => Value::Str(lexeme.to_string()),
            },
            _ => Value::Str(lexeme.to_string()),
        };
        Ok(value)
    }

    fn handle_literal(&mut self, token: &Token) -> Result<()> {
        if self.pending_name.is_none() && self.open_identifier.is_none() {
            // An empty name is no name.
            if !token.lexeme().is_empty() {
                self.pending_name = Some(token.lexeme().to_string());
            }
            return Ok(());
        }

        let value = Self::literal_value(token)?;
        if self.equals_seen {
            let name = self.pending_name.take().unwrap_or_default();
            self.current_mut().push(ValueVariable::new(name, value));
            self.equals_seen = false;
            return Ok(());
        }

        let identifier = match self.open_identifier.take() {
            Some(identifier) => identifier,
            None => Identifier::new(self.pending_name.take().unwrap_or_default()),
        };
        let identifier = self.open_identifier.insert(identifier);
        identifier.push(ValueVariable::new("", value));
        Ok(())
    }

    fn handle_equals(&mut self, token: &Token) -> Result<()> {
        let msg = if self.open_identifier.is_some() {
            "unexpected '=' after value list"
        } else if self.pending_name.is_none() {
            "unexpected '=' without a name"
        } else if self.equals_seen {
            "unexpected second '='"
        } else {
            self.equals_seen = true;
            return Ok(());
        };
        Err(Error::structural(token.line(), token.column(), msg))
    }

    fn open_scope(&mut self, token: &Token) -> Result<()> {
        if self.open_identifier.is_some() {
            return Err(Error::structural(
                token.line(),
                token.column(),
                "unexpected '{' inside value list",
            ));
        }
        if self.equals_seen {
            return Err(Error::structural(
                token.line(),
                token.column(),
                "expected a value after '=', found '{'",
            ));
        }
        let name = self.pending_name.take().unwrap_or_default();
        self.open_scopes.push(Node::new(name));
        Ok(())
    }

    fn close_scope(&mut self, token: &Token) -> Result<()> {
        if self.equals_seen {
            return Err(Error::structural(
                token.line(),
                token.column(),
                "expected a value after '=', found '}'",
            ));
        }
        self.finalize_statement();
        match self.open_scopes.pop() {
            Some(scope) => {
                self.current_mut().push(scope);
                Ok(())
            }
            None => Err(Error::structural(
                token.line(),
                token.column(),
                "unmatched '}'",
            )),
        }
    }

    fn end_statement(&mut self, token: &Token) -> Result<()> {
        if self.equals_seen {
            return Err(Error::structural(
                token.line(),
                token.column(),
                "expected a value after '='",
            ));
        }
        self.finalize_statement();
        Ok(())
    }

    /// Attaches the open value list, or a bare name as an empty one.
    fn finalize_statement(&mut self) {
        if let Some(identifier) = self.open_identifier.take() {
            self.current_mut().push(identifier);
        } else if let Some(name) = self.pending_name.take() {
            self.current_mut().push(Identifier::new(name));
        }
        self.equals_seen = false;
    }
}

impl TokenHandler for TreeBuilder {
    fn handle_token(&mut self, token: &Token) -> Result<()> {
        trace!(
            kind = %token.kind(),
            lexeme = token.lexeme(),
            line = token.line(),
            column = token.column(),
            depth = self.open_scopes.len(),
            "token"
        );
        match token.kind() {
            TokenKind::String | TokenKind::QuotedString | TokenKind::Number | TokenKind::Double => {
                self.handle_literal(token)
            }
            TokenKind::Equals => self.handle_equals(token),
            TokenKind::OpenBrace => self.open_scope(token),
            TokenKind::CloseBrace => self.close_scope(token),
            TokenKind::Eol | TokenKind::Eof => self.end_statement(token),
            TokenKind::Comment | TokenKind::CommentBlock | TokenKind::None => Ok(()),
        }
    }
}
