//! This module turns generated code into values which can be called.

mod frame;
mod term;
mod value;

use std::rc::Rc;

use tracing::trace;

use crate::compiler::Program;
use crate::LoadError;

pub use value::Closure;
pub use value::Deferred;
pub use value::RustFunc;
pub use value::Value;

use frame::Env;
use term::Term;

/// Load `program`, giving its globals the values in `globals`. Most
/// programs are a single lambda, which becomes a closure. A program which is
/// an application is not run here; it becomes a `Value::Deferred` which runs
/// the first time it is used.
pub fn load(program: &Program, globals: &[Value]) -> Result<Value, LoadError> {
    if program.globals.len() != globals.len() {
        return Err(LoadError::GlobalCount {
            expected: program.globals.len(),
            found: globals.len(),
        });
    }
    let mut names = program.globals.clone();
    let term = Term::resolve(&program.code, &mut names)?;

    let env = globals
        .iter()
        .fold(Env::default(), |env, value| env.push(value.clone()));
    let deferred = matches!(term, Term::Apply(..));
    trace!(globals = globals.len(), deferred, "loaded");
    if deferred {
        Ok(Value::Deferred(Rc::new(Deferred::new(term, env))))
    } else {
        Ok(term.eval(&env, 0)?)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::compiler::Code;
    use crate::RuntimeError;

    fn var(name: &str) -> Box<Code> {
        Box::new(Code::Var(name.into()))
    }

    fn closure(param: &str, body: Box<Code>) -> Box<Code> {
        Box::new(Code::Closure {
            param: param.into(),
            body,
        })
    }

    #[test]
    fn test_identity() {
        let program = Program {
            code: *closure("$x", var("$x")),
            globals: vec![],
        };
        let id = load(&program, &[]).unwrap();
        assert!(id.is_callable());
        let result = id.call(Value::atom("yes")).unwrap();
        assert_eq!(result.as_atom(), Some("yes"));
    }

    #[test]
    fn test_globals() {
        // (|$k| $g($k))
        let program = Program {
            code: *closure("$k", Box::new(Code::Apply(var("$g"), var("$k")))),
            globals: vec![Rc::from("$g")],
        };
        let g = Value::native(|v| Ok(Value::atom(format!("g {}", v))));
        let f = load(&program, &[g]).unwrap();
        let result = f.call(Value::atom("k")).unwrap();
        assert_eq!(result.as_atom(), Some("g k"));
    }

    #[test]
    fn test_closures_capture() {
        // (|$a| (|$b| $a)) is K
        let program = Program {
            code: *closure("$a", closure("$b", var("$a"))),
            globals: vec![],
        };
        let k = load(&program, &[]).unwrap();
        let result = k.apply_all([Value::atom("a"), Value::atom("b")]).unwrap();
        assert_eq!(result.as_atom(), Some("a"));
    }

    #[test]
    fn test_unbound_name() {
        let program = Program {
            code: *closure("$x", var("$y")),
            globals: vec![],
        };
        assert_eq!(
            load(&program, &[]).unwrap_err(),
            LoadError::UnboundName("$y".into())
        );
    }

    #[test]
    fn test_global_count() {
        let program = Program::default();
        assert_eq!(
            load(&program, &[Value::Undefined]).unwrap_err(),
            LoadError::GlobalCount {
                expected: 0,
                found: 1
            }
        );
        assert!(matches!(load(&program, &[]), Ok(Value::Undefined)));
    }

    #[test]
    fn test_top_level_call_is_deferred() {
        let program = Program {
            code: Code::Apply(Box::new(Code::Undefined), Box::new(Code::Undefined)),
            globals: vec![],
        };
        let value = load(&program, &[]).unwrap();
        assert!(matches!(value, Value::Deferred(_)));
        assert!(matches!(
            value.call(Value::Undefined),
            Err(RuntimeError::NotCallable(_))
        ));
    }

    #[test]
    fn test_diverging_program_loads() {
        // (|$x| $x($x))(|$x| $x($x))
        let omega = || closure("$x", Box::new(Code::Apply(var("$x"), var("$x"))));
        let program = Program {
            code: Code::Apply(omega(), omega()),
            globals: vec![],
        };
        let value = load(&program, &[]).unwrap();
        assert!(matches!(
            value.force(),
            Err(RuntimeError::DepthExceeded(crate::MAX_EVAL_DEPTH))
        ));
    }
}
