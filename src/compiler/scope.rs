//! Lexical scopes, and the names given to bindings in generated code.
//!
//! Every binding gets a generated name which is safe to print as an
//! identifier and which differs from the generated name of every binding
//! it is nested in. Source names may repeat (shadowing) or sanitize to the
//! same text; the generated names still never collide.

use std::rc::Rc;

/// Put in front of every generated name, so none can be a keyword and all
/// may start with a digit.
const MARKER: char = '$';
/// Appended to a generated name until it collides with no enclosing one.
/// Sanitized names never contain it.
const SUFFIX: char = '\'';

#[derive(Debug)]
struct Binding {
    source_name: String,
    generated_name: Rc<str>,
    parent: Scope,
}

/// A chain of bindings, innermost first. Cloning a scope is cheap, and a
/// scope is never changed once made; `bind` makes a new, longer one.
#[derive(Clone, Debug, Default)]
pub(crate) struct Scope(Option<Rc<Binding>>);

impl Scope {
    pub(crate) fn new() -> Self {
        Scope(None)
    }

    /// A scope which adds a binding for `source_name` inside this one.
    pub(crate) fn bind(&self, source_name: &str) -> Scope {
        let mut generated_name = sanitize(source_name);
        while self.has_generated(&generated_name) {
            generated_name.push(SUFFIX);
        }
        Scope(Some(Rc::new(Binding {
            source_name: source_name.to_string(),
            generated_name: generated_name.into(),
            parent: self.clone(),
        })))
    }

    /// The generated name of the innermost binding, if there is one.
    pub(crate) fn generated_name(&self) -> Option<&Rc<str>> {
        self.0.as_ref().map(|binding| &binding.generated_name)
    }

    /// Find the generated name of the nearest binding of `source_name`.
    pub(crate) fn resolve(&self, source_name: &str) -> Option<&Rc<str>> {
        self.bindings()
            .find(|binding| binding.source_name == source_name)
            .map(|binding| &binding.generated_name)
    }

    fn has_generated(&self, generated_name: &str) -> bool {
        self.bindings()
            .any(|binding| &*binding.generated_name == generated_name)
    }

    fn bindings(&self) -> impl Iterator<Item = &Binding> {
        let mut next = self.0.as_deref();
        std::iter::from_fn(move || {
            let binding = next?;
            next = binding.parent.0.as_deref();
            Some(binding)
        })
    }
}

/// Turn a source name into one made only of ASCII alphanumerics, `_` and the
/// marker. Every other character is spelled out.
pub(crate) fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    out.push(MARKER);
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
            continue;
        }
        out.push(MARKER);
        match escape(c) {
            Some(word) => out.push_str(word),
            None => out.push_str(&format!("u{:04x}", c as u32)),
        }
    }
    out
}

#[rustfmt::skip]
fn escape(c: char) -> Option<&'static str> {
    let word = match c {
        '+' => "plus", '-' => "minus", '*' => "times", '/' => "bar",
        '%' => "perc", '$' => "dollar", '>' => "gt", '<' => "lt",
        '=' => "eq", '&' => "and", '|' => "pipe", '^' => "cflex",
        '~' => "tilde", '!' => "excl", '?' => "quest", '\'' => "quote",
        ':' => "colon", '#' => "hash", '@' => "at", ',' => "comma",
        ';' => "semi", '[' => "lbrack", ']' => "rbrack", '{' => "lbrace",
        '}' => "rbrace", '"' => "dquote", '`' => "tick",
        _ => return None,
    };
    Some(word)
}
