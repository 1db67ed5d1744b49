use std::rc::Rc;

use super::Value;

/// A runtime environment: the values of every enclosing closure parameter,
/// innermost first. Environments are shared between the closures which
/// captured them and never change; `push` makes a new, longer one.
#[derive(Clone, Debug, Default)]
pub(crate) struct Env(Option<Rc<Frame>>);

/// A `Frame` holds the argument a closure was called with.
#[derive(Debug)]
struct Frame {
    value: Value,
    parent: Env,
}

impl Env {
    pub(crate) fn push(&self, value: Value) -> Env {
        Env(Some(Rc::new(Frame {
            value,
            parent: self.clone(),
        })))
    }

    /// The value `depth` frames out from the innermost one.
    pub(crate) fn get(&self, depth: usize) -> Option<&Value> {
        let mut frame = self.0.as_deref()?;
        for _ in 0..depth {
            frame = frame.parent.0.as_deref()?;
        }
        Some(&frame.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get() {
        let env = Env::default()
            .push(Value::atom("a"))
            .push(Value::atom("b"));
        assert_eq!(env.get(0).and_then(Value::as_atom), Some("b"));
        assert_eq!(env.get(1).and_then(Value::as_atom), Some("a"));
        assert!(env.get(2).is_none());
        assert!(Env::default().get(0).is_none());
    }
}
