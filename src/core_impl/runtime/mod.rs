pub(crate) use super::*;

mod builtins;
mod callable_execution;
mod coercions;
mod expression_eval;
mod object_ops;
mod scope_chain;
mod statement_execution;

pub(crate) use builtins::bootstrap_realm;
pub(crate) use object_ops::DescriptorInput;
pub(crate) use statement_execution::ExecFlow;

use crate::runtime_state::{ErrorKind, err_codes};

impl Engine {
    /// Build an error object of the given kind, linked to the realm's
    /// matching prototype.
    pub(crate) fn make_error_object(
        &mut self,
        kind: ErrorKind,
        number: i32,
        message: &str,
    ) -> ObjectHandle {
        let prototype = self.state.intrinsics.error_prototype_for(kind).clone();
        let record = ObjectRecord::new(ObjectClass::Error, Some(prototype));
        let handle = ObjectHandle::new(record);
        {
            let mut record = handle.0.borrow_mut();
            record.set_slot("message", Property::builtin(Value::string(message)));
            record.set_slot("number", Property::builtin(Value::Number(number)));
        }
        handle
    }

    /// Raise a runtime fault: an ordinary Throw completion carrying a fresh
    /// error object. Nothing in the engine is fatal except resource limits,
    /// and even those go through here.
    pub(crate) fn raise(&mut self, kind: ErrorKind, number: i32, message: &str) -> Error {
        let error = self.make_error_object(kind, number, message);
        let rendered = format!("{}: {message}", kind.name());
        Error::ScriptThrown(ThrownValue::new(Value::Object(error), rendered))
    }

    pub(crate) fn raise_type(&mut self, number: i32, message: &str) -> Error {
        self.raise(ErrorKind::Type, number, message)
    }

    pub(crate) fn raise_range(&mut self, number: i32, message: &str) -> Error {
        self.raise(ErrorKind::Range, number, message)
    }

    pub(crate) fn raise_reference(&mut self, message: &str) -> Error {
        self.raise(ErrorKind::Reference, err_codes::UNDEFINED_VARIABLE, message)
    }

    pub(crate) fn raise_syntax(&mut self, message: &str) -> Error {
        self.raise(ErrorKind::Syntax, err_codes::SYNTAX, message)
    }

    /// Wrap a user `throw`. Any value may be thrown; the rendered message
    /// only feeds embedder-side reporting of uncaught errors.
    pub(crate) fn throw_value(&mut self, value: Value) -> Error {
        let rendered = render_thrown(&value);
        Error::ScriptThrown(ThrownValue::new(value, rendered))
    }

    /// Convert a host-reported failure into a catchable script error.
    pub(crate) fn host_error(&mut self, err: Error) -> Error {
        match err {
            Error::HostFailure(message) => {
                self.raise(ErrorKind::Base, err_codes::OBJECT_EXPECTED, &message)
            }
            other => other,
        }
    }
}

/// Cheap, reentrancy-free rendering of a thrown value for diagnostics.
/// Error objects read their own data slots; everything else falls back to
/// primitive formatting.
fn render_thrown(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::Float(v) => format_float(*v),
        Value::String(v) => v.clone(),
        Value::Object(obj) => {
            let record = obj.0.borrow();
            if matches!(record.class, ObjectClass::Error) {
                let name = match record.get_own("name") {
                    Some(Property::Data {
                        value: Value::String(name),
                        ..
                    }) => name.clone(),
                    _ => error_name_from_prototype(&record),
                };
                let message = match record.get_own("message") {
                    Some(Property::Data {
                        value: Value::String(message),
                        ..
                    }) => message.clone(),
                    _ => String::new(),
                };
                if message.is_empty() {
                    name
                } else {
                    format!("{name}: {message}")
                }
            } else {
                format!("[object {}]", record.class.class_name())
            }
        }
    }
}

fn error_name_from_prototype(record: &ObjectRecord) -> String {
    let mut cursor = record.prototype.clone();
    let mut hops = 0;
    while let Some(proto) = cursor {
        let proto_record = proto.0.borrow();
        if let Some(Property::Data {
            value: Value::String(name),
            ..
        }) = proto_record.get_own("name")
        {
            return name.clone();
        }
        cursor = proto_record.prototype.clone();
        hops += 1;
        if hops > 8 {
            break;
        }
    }
    "Error".to_string()
}
