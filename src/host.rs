//! The host-object capability: the single boundary between the language
//! core and everything the embedder provides. A registered host object is
//! indistinguishable from a native object to script, except where this
//! trait says otherwise (the opaque property tag).

use crate::runtime_values::ObjectHandle;
use crate::{Engine, Error, Result, Value};

/// Result of a host property read.
#[derive(Debug, Clone)]
pub enum HostGet {
    Value(Value),
    /// The property exists but is opaque to the scripting layer; `typeof`
    /// reports it as `"unknown"`.
    Unknown,
    Missing,
}

/// Partial descriptor handed to [`HostObject::define_own_property`].
/// Absent fields mean "leave unspecified", mirroring the object-literal
/// descriptors script passes to `Object.defineProperty`.
#[derive(Debug, Clone, Default)]
pub struct HostDescriptor {
    pub value: Option<Value>,
    pub writable: Option<bool>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
    pub get: Option<Value>,
    pub set: Option<Value>,
}

pub trait HostObject {
    fn get(&self, key: &str) -> Result<HostGet>;

    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    fn delete(&mut self, key: &str) -> Result<bool> {
        let _ = key;
        Ok(false)
    }

    fn define_own_property(&mut self, key: &str, descriptor: HostDescriptor) -> Result<bool> {
        let _ = (key, descriptor);
        Ok(false)
    }

    fn own_keys(&self) -> Vec<String>;

    fn is_callable(&self) -> bool {
        false
    }

    fn is_constructor(&self) -> bool {
        false
    }

    fn call(&self, engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
        let _ = (engine, this, args);
        Err(Error::HostFailure("host object is not callable".to_string()))
    }

    fn construct(&self, engine: &mut Engine, args: &[Value]) -> Result<Value> {
        let _ = (engine, args);
        Err(Error::HostFailure(
            "host object is not a constructor".to_string(),
        ))
    }

    fn prototype_of(&self) -> Option<ObjectHandle> {
        None
    }
}
