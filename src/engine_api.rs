use std::cell::RefCell;
use std::rc::Rc;

use crate::core_impl::{parser, runtime};
use crate::host::HostObject;
use crate::runtime_state::RuntimeState;
use crate::{EngineConfig, Result, Value};

/// One script engine instance: a realm (global object, intrinsics) plus
/// the evaluator state. Engines are independent; nothing is shared between
/// two instances, and a single instance is strictly single-threaded.
pub struct Engine {
    pub(crate) state: RuntimeState,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let state = runtime::bootstrap_realm(config);
        let mut engine = Self { state };
        engine.install_builtins();
        engine
    }

    /// Evaluate a top-level program. The result is the value of the last
    /// expression statement executed, like a script host's "evaluate and
    /// report" mode. Parse failures surface as [`crate::Error::ScriptParse`];
    /// uncaught script throws as [`crate::Error::ScriptThrown`].
    pub fn eval(&mut self, source: &str) -> Result<Value> {
        let program = parser::parse_program(source, self.state.config.legacy_octal_literals)?;
        let scope = self.state.global_scope.clone();
        self.run_program(&program, &scope, false)
    }

    pub fn get_global(&mut self, name: &str) -> Result<Value> {
        let global = self.state.global.clone();
        let receiver = Value::Object(global.clone());
        self.object_get(&global, name, &receiver)
    }

    pub fn set_global(&mut self, name: &str, value: Value) -> Result<()> {
        let global = self.state.global.clone();
        self.object_set(&global, name, value)
    }

    /// Call a global function by name, with the global object as `this`.
    pub fn call_global(&mut self, name: &str, args: &[Value]) -> Result<Value> {
        let func = self.get_global(name)?;
        self.call_value(&func, &Value::Undefined, args)
    }

    /// Expose an embedder object to script under a global name. The engine
    /// only ever talks to it through the [`HostObject`] capability.
    pub fn register_host_object(&mut self, name: &str, host: Rc<RefCell<dyn HostObject>>) -> Value {
        self.register_host_object_value(name, host)
    }

    /// Render any value the way script's string coercion would.
    pub fn to_display_string(&mut self, value: &Value) -> Result<String> {
        self.to_string_value(value)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
