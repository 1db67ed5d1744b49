//! The untyped lambda calculus, compiled to closures.
//!
//! Source like `\f.\x.f (f x)` is tokenized, parsed, and translated into
//! [`Code`] in which every parameter has a name distinct from every
//! parameter around it. That code is then loaded into a [`Value`] which
//! can be called from Rust.
//!
//! Compiling never stops at the first problem. Every problem found is
//! reported as a [`Diagnostic`], and a compile with any diagnostics gives a
//! value which should not be trusted.

#![warn(future_incompatible)]
#![warn(non_ascii_idents)]
#![warn(rust_2018_idioms)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused)]

mod compiler;
mod error;
mod options;
mod vm;

use std::collections::BTreeMap;

use tracing::warn;

pub use compiler::{is_identifier, is_whitespace, Code, Program, Token, TokenType};
pub use error::{Cause, Diagnostic, LoadError, RuntimeError};
pub use options::CompileOptions;
pub use vm::{load, Closure, Deferred, RustFunc, Value};

/// How deeply evaluation may nest before it gives up with
/// `RuntimeError::DepthExceeded`.
pub const MAX_EVAL_DEPTH: usize = 512;

/// The result of compiling one source string.
#[derive(Clone, Debug)]
pub struct Compilation {
    /// The compiled value. Unreliable unless `diagnostics` is empty.
    pub value: Value,
    /// The generated code, before loading.
    pub program: Program,
    /// Every problem found, in the order found.
    pub diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The value, if there were no diagnostics.
    pub fn into_result(self) -> Result<Value, Vec<Diagnostic>> {
        if self.diagnostics.is_empty() {
            Ok(self.value)
        } else {
            Err(self.diagnostics)
        }
    }
}

/// The results of compiling several named sources. Every name given appears
/// once in each map.
#[derive(Clone, Debug, Default)]
pub struct Batch {
    pub values: BTreeMap<String, Value>,
    pub diagnostics: BTreeMap<String, Vec<Diagnostic>>,
    /// The generated code for each name.
    pub programs: BTreeMap<String, Program>,
}

impl Batch {
    /// Whether every source compiled without diagnostics.
    pub fn is_ok(&self) -> bool {
        self.diagnostics.values().all(Vec::is_empty)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

/// Compile `source` with no globals.
pub fn compile(source: &str) -> Compilation {
    compile_with(source, &CompileOptions::default())
}

pub fn compile_with(source: &str, options: &CompileOptions) -> Compilation {
    let (program, mut diagnostics) = compiler::compile_str(source, options.global_names());
    let value = match load(&program, &options.global_values()) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "failed to load generated code");
            diagnostics.push(Diagnostic::from(e));
            Value::Undefined
        }
    };
    Compilation {
        value,
        program,
        diagnostics,
    }
}

/// Compile every source in `sources`, each under its own name. If a name is
/// given twice, the last source wins.
pub fn compile_all<K, S>(sources: impl IntoIterator<Item = (K, S)>, options: &CompileOptions) -> Batch
where
    K: Into<String>,
    S: AsRef<str>,
{
    let mut batch = Batch::default();
    for (name, source) in sources {
        let name = name.into();
        let Compilation {
            value,
            program,
            diagnostics,
        } = compile_with(source.as_ref(), options);
        batch.values.insert(name.clone(), value);
        batch.programs.insert(name.clone(), program);
        batch.diagnostics.insert(name, diagnostics);
    }
    batch
}
