pub(crate) use super::*;

mod builtin_library;
mod control_flow;
mod language_core_expressions;
mod lexer_and_parser;
mod objects_and_descriptors;
mod value_coercions;

/// Evaluate on a fresh engine; panics on any error, for the happy-path
/// suites.
pub(crate) fn eval(src: &str) -> Value {
    let mut engine = Engine::new();
    match engine.eval(src) {
        Ok(value) => value,
        Err(err) => panic!("eval({src:?}) failed: {err}"),
    }
}

pub(crate) fn eval_bool(src: &str) -> bool {
    match eval(src) {
        Value::Bool(value) => value,
        other => panic!("eval({src:?}) = {other:?}, expected a boolean"),
    }
}

pub(crate) fn eval_str(src: &str) -> String {
    match eval(src) {
        Value::String(value) => value,
        other => panic!("eval({src:?}) = {other:?}, expected a string"),
    }
}

pub(crate) fn eval_err(src: &str) -> Error {
    let mut engine = Engine::new();
    match engine.eval(src) {
        Ok(value) => panic!("eval({src:?}) = {value:?}, expected an error"),
        Err(err) => err,
    }
}

/// The `name: message` rendering of an uncaught throw.
pub(crate) fn eval_thrown_message(src: &str) -> String {
    match eval_err(src) {
        Error::ScriptThrown(thrown) => thrown.message().to_string(),
        other => panic!("eval({src:?}) = {other:?}, expected a script throw"),
    }
}
