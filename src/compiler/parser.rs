use tracing::debug;

use super::ast::{Expr, Lambda};
use super::lexer::TokenStream;
use super::Token;
use super::TokenType;
use crate::error::Cause;
use crate::Diagnostic;

/// Tracks the current state, to make parsing easier.
#[derive(Debug)]
struct Parser<'a> {
    /// The input token stream.
    input: TokenStream<'a>,
    /// Every problem found so far, in the order it was found.
    diagnostics: Vec<Diagnostic>,
}

/// Parses source code into an `Expr`. Parsing never stops at the first
/// error; the returned tree is a best guess at what was meant.
pub(crate) fn parse_str(source: &str) -> (Expr, Vec<Diagnostic>) {
    let mut parser = Parser {
        input: TokenStream::new(source),
        diagnostics: Vec::new(),
    };
    let expr = parser.parse_expression(TokenType::EndOfFile);
    debug!(diagnostics = parser.diagnostics.len(), "parsed expression");
    (expr, parser.diagnostics)
}

impl Parser<'_> {
    // Helper functions

    fn current(&self) -> &Token {
        self.input.current()
    }

    fn push_error(&mut self, token: &Token, message: String) {
        self.diagnostics.push(Diagnostic::at_token(token, message));
    }

    // Actual parsing

    /// Parses a sequence of juxtaposed terms, up to (but not past) a token of
    /// type `terminator`. The terms are folded left, so `a b c` is
    /// `(a b) c`.
    fn parse_expression(&mut self, terminator: TokenType) -> Expr {
        let mut expr = Expr::Empty;
        // Whether any term was folded in, even an empty group.
        let mut has_term = false;
        loop {
            let token = self.current().clone();
            if token.typ == terminator {
                if !has_term {
                    self.push_error(&token, format!("empty expression (found {})", token));
                }
                return expr;
            }
            match token.typ {
                TokenType::Identifier => {
                    self.input.advance();
                    expr = expr.apply(Expr::Var(token));
                }
                TokenType::Binder => {
                    // The lambda's body reaches the terminator, so it finishes
                    // this expression as well.
                    let lambda = self.parse_lambda(terminator);
                    return expr.apply(lambda);
                }
                TokenType::GroupOpen => {
                    let inner = self.parse_group(&token);
                    expr = expr.apply(inner);
                }
                TokenType::BodyDelimiter | TokenType::GroupClose | TokenType::EndOfFile => {
                    self.push_error(&token, format!("unexpected token {}", token));
                    if token.is_eof() {
                        return expr;
                    }
                    self.input.advance();
                    continue;
                }
            }
            has_term = true;
        }
    }

    /// Parses a parenthesized expression. `open` is the current token.
    fn parse_group(&mut self, open: &Token) -> Expr {
        self.input.advance();
        let start = self.diagnostics.len();
        let inner = self.parse_expression(TokenType::GroupClose);

        let unclosed = match self.diagnostics[start..].last_mut() {
            Some(last) if last.is_caused_by_eof() => {
                last.message.push_str(&format!(
                    " (the cause is likely to be the parenthesis at line {} column {})",
                    open.line, open.column
                ));
                let inner_cause = std::mem::replace(&mut last.cause, Cause::Token(open.clone()));
                last.cause = Cause::UnclosedGroup {
                    open: open.clone(),
                    inner: Box::new(inner_cause),
                };
                true
            }
            _ => false,
        };
        if !unclosed {
            // Past the `)`
            self.input.advance();
        }
        inner
    }

    /// Parses a lambda, starting at its binder. Missing pieces are reported
    /// and then assumed to be there.
    fn parse_lambda(&mut self, terminator: TokenType) -> Expr {
        let binder = self.current().clone();
        self.input.advance();

        let token = self.current().clone();
        let param = if token.typ == TokenType::Identifier {
            self.input.advance();
            Some(token)
        } else {
            self.push_error(&token, format!("expecting identifier, found {}", token));
            None
        };

        let token = self.current().clone();
        if token.typ == TokenType::BodyDelimiter {
            self.input.advance();
        } else {
            self.push_error(
                &token,
                format!("expecting . (body delimiter), found {}", token),
            );
        }

        let body = self.parse_expression(terminator);
        Expr::Lambda(Lambda {
            binder,
            param,
            body: Box::new(body),
        })
    }
}
