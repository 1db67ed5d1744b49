use crate::Value;

/// Settings for a compile.
#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    /// Names which compiled code may refer to without binding them, and the
    /// values they stand for. Later globals are nested inside earlier ones,
    /// so a repeated name refers to its last value.
    pub globals: Vec<(String, Value)>,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `name` refer to `value` in compiled code.
    pub fn with_global(mut self, name: impl Into<String>, value: Value) -> Self {
        self.globals.push((name.into(), value));
        self
    }

    pub(crate) fn global_names(&self) -> impl Iterator<Item = &str> {
        self.globals.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn global_values(&self) -> Vec<Value> {
        self.globals.iter().map(|(_, value)| value.clone()).collect()
    }
}
