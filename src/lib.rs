//! An embeddable, deterministic ECMAScript (ES3/ES5-era) interpreter.
//!
//! The crate evaluates JavaScript source synchronously on a single thread:
//! source text is tokenized, parsed to an immutable AST, and executed by a
//! tree-walking evaluator over a shared object graph. Everything outside the
//! language core (DOM nodes, timers, I/O) is reached through the
//! [`HostObject`] capability and can be plugged in by the embedder.
//!
//! ```
//! use script_engine::{Engine, Value};
//!
//! let mut engine = Engine::new();
//! let value = engine.eval("var x = 2; x * 21;").unwrap();
//! assert_eq!(value, Value::Number(42));
//! ```

use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub enum Error {
    ScriptParse(String),
    ScriptThrown(ThrownValue),
    HostFailure(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScriptParse(msg) => write!(f, "script parse error: {msg}"),
            Self::ScriptThrown(thrown) => write!(f, "uncaught script error: {}", thrown.message()),
            Self::HostFailure(msg) => write!(f, "host object failure: {msg}"),
        }
    }
}

impl StdError for Error {}

mod core_impl;
mod core_script_utils;
mod engine_api;
mod host;
mod js_regex;
mod runtime_state;
mod runtime_values;
mod script_ast;

#[cfg(test)]
mod tests;

pub use engine_api::Engine;
pub use host::{HostDescriptor, HostGet, HostObject};
pub use runtime_state::{DeletePolicy, EngineConfig};
pub use runtime_values::{ThrownValue, Value, VariantTag};

pub(crate) use core_script_utils::*;
pub(crate) use runtime_state::*;
pub(crate) use runtime_values::*;
pub(crate) use script_ast::*;
