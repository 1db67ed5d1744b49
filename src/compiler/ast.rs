//! This module holds the syntax tree produced by the parser.

use super::Token;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Expr {
    /// The starting point of an application chain. Applying `Empty` to
    /// anything gives back that thing.
    Empty,
    Var(Token),
    Apply(Apply),
    Lambda(Lambda),
}

/// `callee argument`
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Apply {
    pub(crate) callee: Box<Expr>,
    pub(crate) argument: Box<Expr>,
}

/// `\param.body`
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Lambda {
    /// The binder token, which gives the lambda its position.
    pub(crate) binder: Token,
    /// `None` when the source was missing the parameter.
    pub(crate) param: Option<Token>,
    pub(crate) body: Box<Expr>,
}

impl Expr {
    /// Extend an application chain: `f`.apply(`x`) is `f x`.
    pub(crate) fn apply(self, argument: Expr) -> Expr {
        match self {
            Expr::Empty => argument,
            callee => Expr::Apply(Apply {
                callee: Box::new(callee),
                argument: Box::new(argument),
            }),
        }
    }

    /// Line and column of the token which defines this node. Applications
    /// are placed at their callee.
    pub(crate) fn line_and_column(&self) -> Option<(u32, u32)> {
        let mut head = self;
        while let Expr::Apply(apply) = head {
            head = &apply.callee;
        }
        match head {
            Expr::Empty | Expr::Apply(_) => None,
            Expr::Var(token) => Some((token.line, token.column)),
            Expr::Lambda(lambda) => Some((lambda.binder.line, lambda.binder.column)),
        }
    }

    /// The innermost callee of an application chain, and its arguments in
    /// source order. Anything else is its own head.
    pub(crate) fn spine(&self) -> (&Expr, Vec<&Expr>) {
        let mut head = self;
        let mut arguments = Vec::new();
        while let Expr::Apply(apply) = head {
            arguments.push(&*apply.argument);
            head = &apply.callee;
        }
        arguments.reverse();
        (head, arguments)
    }

    fn take_children(&mut self, out: &mut Vec<Expr>) {
        let mut push = |child: &mut Box<Expr>| {
            if matches!(**child, Expr::Apply(_) | Expr::Lambda(_)) {
                out.push(std::mem::replace(&mut **child, Expr::Empty));
            }
        };
        match self {
            Expr::Apply(apply) => {
                push(&mut apply.callee);
                push(&mut apply.argument);
            }
            Expr::Lambda(lambda) => push(&mut lambda.body),
            Expr::Empty | Expr::Var(_) => {}
        }
    }
}

// A run of juxtaposed terms is one long chain, so dropping walks it with a
// loop.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_children(&mut stack);
        while let Some(mut expr) = stack.pop() {
            expr.take_children(&mut stack);
        }
    }
}

impl Lambda {
    /// The parameter's source name. A missing parameter is bound under the
    /// empty name, which no identifier can spell.
    pub(crate) fn param_name(&self) -> &str {
        self.param.as_ref().and_then(Token::name).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::super::TokenType;
    use super::*;

    fn var(name: &str, column: u32) -> Expr {
        Expr::Var(Token::new(TokenType::Identifier, 1, column, name))
    }

    #[test]
    fn test_empty_is_identity() {
        assert_eq!(Expr::Empty.apply(var("x", 1)), var("x", 1));
        assert_eq!(Expr::Empty.apply(Expr::Empty), Expr::Empty);
    }

    #[test]
    fn test_apply_position() {
        let expr = var("f", 3).apply(var("x", 5));
        assert_eq!(expr.line_and_column(), Some((1, 3)));
        assert_eq!(Expr::Empty.line_and_column(), None);
    }

    #[test]
    fn test_spine() {
        let expr = var("f", 1).apply(var("x", 3)).apply(var("y", 5));
        let (head, arguments) = expr.spine();
        assert_eq!(head, &var("f", 1));
        assert_eq!(arguments, [&var("x", 3), &var("y", 5)]);
    }

    #[test]
    fn test_wide_chain() {
        let mut expr = var("f", 1);
        for column in 0..100_000 {
            expr = expr.apply(var("x", column));
        }
        assert_eq!(expr.line_and_column(), Some((1, 1)));
        assert_eq!(expr.spine().1.len(), 100_000);
    }
}
