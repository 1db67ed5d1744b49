use std::rc::Rc;

use tracing::debug;

use super::ast::{Expr, Lambda};
use super::scope::Scope;
use super::Code;
use super::Program;
use crate::error::Cause;
use crate::Diagnostic;

/// Tracks the problems found while generating code.
#[derive(Debug, Default)]
struct Generator {
    diagnostics: Vec<Diagnostic>,
}

/// Turn a parsed expression into code. `globals` are bound outside of
/// everything else, in order, so the last one is innermost.
pub(crate) fn translate<'a>(
    expr: &Expr,
    globals: impl IntoIterator<Item = &'a str>,
) -> (Program, Vec<Diagnostic>) {
    let mut scope = Scope::new();
    let mut global_names = Vec::new();
    for name in globals {
        scope = scope.bind(name);
        if let Some(generated) = scope.generated_name() {
            global_names.push(Rc::clone(generated));
        }
    }

    let mut generator = Generator::default();
    let code = generator.translate(expr, &scope);
    debug!(
        %code,
        position = ?expr.line_and_column(),
        diagnostics = generator.diagnostics.len(),
        "generated code"
    );
    let program = Program {
        code,
        globals: global_names,
    };
    (program, generator.diagnostics)
}

impl Generator {
    fn translate(&mut self, expr: &Expr, scope: &Scope) -> Code {
        match expr {
            Expr::Empty => Code::Undefined,
            Expr::Var(token) => {
                let name = token.name().unwrap_or_default();
                match scope.resolve(name) {
                    Some(generated) => Code::Var(Rc::clone(generated)),
                    None => {
                        self.diagnostics.push(Diagnostic::new(
                            token.line,
                            token.column,
                            format!("unresolved variable `{}`", name),
                            Cause::Variable(token.clone()),
                        ));
                        Code::Undefined
                    }
                }
            }
            // The callee always goes first, so diagnostics come out in
            // source order.
            Expr::Apply(_) => {
                let (head, arguments) = expr.spine();
                let mut code = self.translate(head, scope);
                for argument in arguments {
                    let argument = self.translate(argument, scope);
                    code = Code::Apply(Box::new(code), Box::new(argument));
                }
                code
            }
            Expr::Lambda(lambda) => self.translate_lambda(lambda, scope),
        }
    }

    fn translate_lambda(&mut self, lambda: &Lambda, scope: &Scope) -> Code {
        let inner = scope.bind(lambda.param_name());
        let body = self.translate(&lambda.body, &inner);
        match inner.generated_name() {
            Some(param) => Code::Closure {
                param: Rc::clone(param),
                body: Box::new(body),
            },
            None => Code::Undefined,
        }
    }
}
