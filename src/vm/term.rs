//! Code whose variables have been resolved to environment slots, ready to
//! evaluate.

use std::rc::Rc;

use super::frame::Env;
use super::value::Closure;
use super::Value;
use crate::compiler::Code;
use crate::LoadError;
use crate::RuntimeError;
use crate::MAX_EVAL_DEPTH;

#[derive(Debug)]
pub(crate) enum Term {
    Undefined,
    /// A variable, counted in frames out from the innermost one.
    Slot(usize),
    Apply(Box<Term>, Box<Term>),
    Lambda(Rc<Term>),
}

impl Term {
    /// Resolve the names in `code`. `names` holds the names in scope,
    /// outermost first.
    pub(crate) fn resolve(code: &Code, names: &mut Vec<Rc<str>>) -> Result<Term, LoadError> {
        let term = match code {
            Code::Undefined => Term::Undefined,
            Code::Var(name) => {
                let depth = names
                    .iter()
                    .rev()
                    .position(|n| n == name)
                    .ok_or_else(|| LoadError::UnboundName(name.to_string()))?;
                Term::Slot(depth)
            }
            Code::Apply(..) => {
                let (head, arguments) = code.spine();
                let mut term = Term::resolve(head, names)?;
                for argument in arguments {
                    let argument = Term::resolve(argument, names)?;
                    term = Term::Apply(Box::new(term), Box::new(argument));
                }
                term
            }
            Code::Closure { param, body } => {
                names.push(Rc::clone(param));
                let body = Term::resolve(body, names);
                names.pop();
                Term::Lambda(Rc::new(body?))
            }
        };
        Ok(term)
    }

    /// The innermost callee of an application chain, and its arguments in
    /// the order they are applied.
    fn spine(&self) -> (&Term, Vec<&Term>) {
        let mut head = self;
        let mut arguments = Vec::new();
        while let Term::Apply(callee, argument) = head {
            arguments.push(&**argument);
            head = callee;
        }
        arguments.reverse();
        (head, arguments)
    }

    /// Evaluate call-by-value: both sides of an application are evaluated,
    /// callee first, before the call. `depth` counts the evaluations this one
    /// is nested in.
    pub(crate) fn eval(&self, env: &Env, depth: usize) -> Result<Value, RuntimeError> {
        if depth >= MAX_EVAL_DEPTH {
            return Err(RuntimeError::DepthExceeded(MAX_EVAL_DEPTH));
        }
        match self {
            Term::Undefined => Ok(Value::Undefined),
            Term::Slot(slot) => env
                .get(*slot)
                .cloned()
                .ok_or(RuntimeError::MissingSlot(*slot)),
            Term::Apply(..) => {
                let (head, arguments) = self.spine();
                let mut func = head.eval(env, depth + 1)?;
                for argument in arguments {
                    let arg = argument.eval(env, depth + 1)?;
                    func = func.call_at(arg, depth + 1)?;
                }
                Ok(func)
            }
            Term::Lambda(body) => Ok(Value::Closure(Closure {
                body: Rc::clone(body),
                env: env.clone(),
            })),
        }
    }
}

// Application chains are as long as the source is wide, so they are taken
// apart with a loop.
impl Drop for Term {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_applications(&mut stack);
        while let Some(mut term) = stack.pop() {
            term.take_applications(&mut stack);
        }
    }
}

impl Term {
    fn take_applications(&mut self, out: &mut Vec<Term>) {
        if let Term::Apply(callee, argument) = self {
            for child in [callee, argument] {
                if matches!(**child, Term::Apply(..)) {
                    out.push(std::mem::replace(&mut **child, Term::Undefined));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Box<Code> {
        Box::new(Code::Var(name.into()))
    }

    /// `\x. x x ... x` with `n` arguments.
    fn wide(n: usize) -> Code {
        let mut body = *var("$x");
        for _ in 0..n {
            body = Code::Apply(Box::new(body), var("$x"));
        }
        Code::Closure {
            param: "$x".into(),
            body: Box::new(body),
        }
    }

    #[test]
    fn test_resolve_slots() {
        let code = Code::Closure {
            param: "$a".into(),
            body: Box::new(Code::Apply(var("$a"), var("$g"))),
        };
        let mut names = vec![Rc::from("$g")];
        let term = Term::resolve(&code, &mut names).unwrap();
        assert_eq!(names.len(), 1);
        match term {
            Term::Lambda(ref body) => match &**body {
                Term::Apply(callee, argument) => {
                    assert!(matches!(**callee, Term::Slot(0)));
                    assert!(matches!(**argument, Term::Slot(1)));
                }
                other => panic!("expected an application, got {:?}", other),
            },
            ref other => panic!("expected a lambda, got {:?}", other),
        }
    }

    #[test]
    fn test_wide_application() {
        let term = Term::resolve(&wide(100_000), &mut Vec::new()).unwrap();
        let id = Value::native(Ok);
        let value = term.eval(&Env::default(), 0).unwrap();
        let result = value.call(id).unwrap();
        assert!(result.is_callable());
    }

    #[test]
    fn test_depth_limit() {
        // (\x.x x)(\x.x x)
        let omega = || {
            Box::new(Code::Closure {
                param: "$x".into(),
                body: Box::new(Code::Apply(var("$x"), var("$x"))),
            })
        };
        let code = Code::Apply(omega(), omega());
        let term = Term::resolve(&code, &mut Vec::new()).unwrap();
        assert_eq!(
            term.eval(&Env::default(), 0).unwrap_err(),
            RuntimeError::DepthExceeded(MAX_EVAL_DEPTH)
        );
    }
}
