use std::collections::HashSet;

use lambda::{compile, compile_with, Code, CompileOptions, Value};
use proptest::prelude::*;

/// Parameter names, including ones which sanitize to the same text.
fn param() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("x".to_string()),
        Just("x'".to_string()),
        Just("$".to_string()),
        Just("\u{1f41}1".to_string()),
        Just("\u{1f411}".to_string()),
        "[a-z+*'!é]{1,3}",
    ]
}

/// Collects the parameter of every closure on the path to each variable,
/// and checks that no path repeats a name.
fn assert_distinct_params(code: &Code, path: &mut Vec<String>) {
    match code {
        Code::Undefined | Code::Var(_) => {}
        Code::Apply(callee, argument) => {
            assert_distinct_params(callee, path);
            assert_distinct_params(argument, path);
        }
        Code::Closure { param, body } => {
            assert!(
                !path.iter().any(|p| **p == **param),
                "{} repeats in {:?}",
                param,
                path
            );
            path.push(param.to_string());
            assert_distinct_params(body, path);
            path.pop();
        }
    }
}

proptest! {
    #[test]
    fn nested_params_get_distinct_names(params in prop::collection::vec(param(), 1..8)) {
        // \p1.\p2. ... \pn.p1
        let mut source: String = params.iter().map(|p| format!("\\{}.", p)).collect();
        source.push_str(&params[0]);
        let compilation = compile(&source);
        prop_assert!(compilation.is_ok(), "{:?}", compilation.diagnostics);
        assert_distinct_params(&compilation.program.code, &mut Vec::new());
    }

    #[test]
    fn innermost_binding_wins(params in prop::collection::vec(param(), 1..6)) {
        // The body names the last parameter, so it selects the last argument.
        let mut source: String = params.iter().map(|p| format!("\\{}.", p)).collect();
        source.push_str(&params[params.len() - 1]);
        let value = compile(&source).into_result().unwrap();
        let args = (0..params.len()).map(|i| Value::atom(i.to_string()));
        let result = value.apply_all(args).unwrap();
        let expected = (params.len() - 1).to_string();
        prop_assert_eq!(result.as_atom(), Some(expected.as_str()));
    }

    #[test]
    fn compiling_is_deterministic(source in r"[\\.() a-c\n]{0,24}") {
        let first = compile(&source);
        let second = compile(&source);
        prop_assert_eq!(first.diagnostics, second.diagnostics);
        prop_assert_eq!(first.program.code.to_string(), second.program.code.to_string());
    }

    #[test]
    fn globals_never_collide(names in prop::collection::vec(param(), 1..5)) {
        let options = names
            .iter()
            .fold(CompileOptions::new(), |options, name| {
                options.with_global(name.as_str(), Value::atom(name.as_str()))
            });
        let compilation = compile_with(&names[0], &options);
        prop_assert!(compilation.is_ok(), "{:?}", compilation.diagnostics);
        let unique: HashSet<_> = compilation.program.globals.iter().collect();
        prop_assert_eq!(unique.len(), names.len());
        // The last global with the first name shadows the others.
        let last = names.iter().rposition(|n| *n == names[0]).unwrap_or(0);
        prop_assert_eq!(compilation.value.as_atom(), Some(names[last].as_str()));
    }
}
