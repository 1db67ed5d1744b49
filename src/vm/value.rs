use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use super::frame::Env;
use super::term::Term;
use crate::RuntimeError;

/// The type of functions written in Rust which compiled code may call.
pub type RustFunc = dyn Fn(Value) -> Result<Value, RuntimeError>;

/// A value produced by compiled code, or handed to it by the host.
#[derive(Clone)]
pub enum Value {
    /// The result of code which failed to compile.
    Undefined,
    /// An opaque value from the host. Compiled code can only pass it along.
    Atom(Rc<str>),
    /// A compiled lambda and the environment it closed over.
    Closure(Closure),
    /// A host function.
    Native(Rc<RustFunc>),
    /// Top-level code which is only evaluated once it is needed.
    Deferred(Rc<Deferred>),
}

#[derive(Clone, Debug)]
pub struct Closure {
    pub(super) body: Rc<Term>,
    pub(super) env: Env,
}

/// An application which has not been evaluated yet. The first time it is
/// forced the result is kept, so it is evaluated at most once successfully.
pub struct Deferred {
    term: Term,
    env: Env,
    value: OnceCell<Value>,
}

impl Deferred {
    pub(super) fn new(term: Term, env: Env) -> Self {
        Deferred {
            term,
            env,
            value: OnceCell::new(),
        }
    }

    fn force_at(&self, depth: usize) -> Result<&Value, RuntimeError> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }
        let value = self.term.eval(&self.env, depth)?.force_at(depth)?.clone();
        Ok(self.value.get_or_init(|| value))
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("value", &self.value.get())
            .finish_non_exhaustive()
    }
}

impl Value {
    pub fn atom(name: impl Into<Rc<str>>) -> Self {
        Value::Atom(name.into())
    }

    pub fn native(func: impl Fn(Value) -> Result<Value, RuntimeError> + 'static) -> Self {
        Value::Native(Rc::new(func))
    }

    /// The atom's name, if this is an atom. A deferred value is forced to
    /// find out.
    pub fn as_atom(&self) -> Option<&str> {
        match self.force() {
            Ok(Value::Atom(name)) => Some(&**name),
            _ => None,
        }
    }

    /// Whether this is a function. A deferred value is forced to find out.
    pub fn is_callable(&self) -> bool {
        matches!(self.force(), Ok(Value::Closure(_) | Value::Native(_)))
    }

    /// The value this stands for: a deferred value is evaluated, anything
    /// else is itself.
    pub fn force(&self) -> Result<&Value, RuntimeError> {
        self.force_at(0)
    }

    fn force_at(&self, depth: usize) -> Result<&Value, RuntimeError> {
        match self {
            Value::Deferred(deferred) => deferred.force_at(depth),
            other => Ok(other),
        }
    }

    /// Call this value with a single argument.
    pub fn call(&self, arg: Value) -> Result<Value, RuntimeError> {
        self.call_at(arg, 0)
    }

    /// Call this value from an evaluation nested `depth` deep. Native
    /// functions start over at zero when they call back in.
    pub(super) fn call_at(&self, arg: Value, depth: usize) -> Result<Value, RuntimeError> {
        match self {
            Value::Closure(closure) => closure.body.eval(&closure.env.push(arg), depth),
            Value::Native(func) => (**func)(arg),
            Value::Deferred(deferred) => deferred.force_at(depth)?.call_at(arg, depth),
            other => Err(RuntimeError::NotCallable(other.to_string())),
        }
    }

    /// Call this value with each argument in turn: `f.apply_all([x, y])` is
    /// `f(x)(y)`.
    pub fn apply_all(&self, args: impl IntoIterator<Item = Value>) -> Result<Value, RuntimeError> {
        args.into_iter()
            .try_fold(self.clone(), |func, arg| func.call(arg))
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Atom(name) => write!(f, "Atom({:?})", name),
            Value::Closure(closure) => write!(f, "<closure: {:p}>", Rc::as_ptr(&closure.body)),
            Value::Native(func) => write!(f, "<native function: {:p}>", Rc::as_ptr(func)),
            Value::Deferred(deferred) => fmt::Debug::fmt(&**deferred, f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Atom(name) => f.write_str(name),
            Value::Closure(_) => write!(f, "<closure>"),
            Value::Native(_) => write!(f, "<native function>"),
            Value::Deferred(_) => write!(f, "<deferred>"),
        }
    }
}
