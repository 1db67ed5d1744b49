//! Functions and types associated with converting source code into code the
//! runtime can load.

mod ast;
mod codegen;
mod lexer;
mod parser;
mod scope;
mod token;

use std::fmt;
use std::rc::Rc;

use super::Diagnostic;

pub use lexer::{is_identifier, is_whitespace};
pub use token::Token;
pub use token::TokenType;

/// The generated form of an expression: a tree of closures, applications and
/// references to the generated names of enclosing closure parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Code {
    /// Stands in for anything which could not be compiled.
    Undefined,
    Var(Rc<str>),
    Apply(Box<Code>, Box<Code>),
    Closure { param: Rc<str>, body: Box<Code> },
}

/// `Code` along with the generated names of the globals it was compiled
/// against, outermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    pub code: Code,
    pub globals: Vec<Rc<str>>,
}

impl Default for Code {
    fn default() -> Self {
        Code::Undefined
    }
}

impl Code {
    /// The innermost callee of an application chain, and its arguments in
    /// the order they are applied. Anything else is its own head.
    pub(crate) fn spine(&self) -> (&Code, Vec<&Code>) {
        let mut head = self;
        let mut arguments = Vec::new();
        while let Code::Apply(callee, argument) = head {
            arguments.push(&**argument);
            head = callee;
        }
        arguments.reverse();
        (head, arguments)
    }

    fn take_children(&mut self, out: &mut Vec<Code>) {
        let mut push = |child: &mut Box<Code>| {
            if matches!(**child, Code::Apply(..) | Code::Closure { .. }) {
                out.push(std::mem::take(&mut **child));
            }
        };
        match self {
            Code::Apply(callee, argument) => {
                push(callee);
                push(argument);
            }
            Code::Closure { body, .. } => push(body),
            Code::Undefined | Code::Var(_) => {}
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Undefined => f.write_str("undefined"),
            Code::Var(name) => f.write_str(name),
            Code::Apply(..) => {
                let (head, arguments) = self.spine();
                write!(f, "{}", head)?;
                for argument in arguments {
                    write!(f, "({})", argument)?;
                }
                Ok(())
            }
            Code::Closure { param, body } => write!(f, "(|{}| {})", param, body),
        }
    }
}

impl Drop for Code {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_children(&mut stack);
        while let Some(mut code) = stack.pop() {
            code.take_children(&mut stack);
        }
    }
}

/// Run the front end over `source`: parse it, then generate code with the
/// given globals in scope. Diagnostics from parsing come first.
pub(super) fn compile_str<'a>(
    source: &str,
    globals: impl IntoIterator<Item = &'a str>,
) -> (Program, Vec<Diagnostic>) {
    let (expr, mut diagnostics) = parser::parse_str(source);
    let (program, more) = codegen::translate(&expr, globals);
    diagnostics.extend(more);
    (program, diagnostics)
}
