use super::*;

use crate::runtime_state::ErrorKind;

impl Engine {
    pub(super) fn install_error_builtins(&mut self) {
        for kind in ErrorKind::all() {
            let prototype = self.state.intrinsics.error_prototype_for(kind).clone();
            {
                let mut record = prototype.0.borrow_mut();
                record.set_slot("name", Property::builtin(Value::string(kind.name())));
                record.set_slot("message", Property::builtin(Value::string("")));
            }
            self.add_method(&prototype, "toString", 0, error_to_string);
            let (name, call, construct) = ctor_entry(kind);
            self.add_constructor(name, 1, call, construct, &prototype);
        }
    }

    fn construct_error(&mut self, kind: ErrorKind, args: &[Value]) -> Result<Value> {
        let prototype = self.state.intrinsics.error_prototype_for(kind).clone();
        let error = ObjectHandle::new(ObjectRecord::new(ObjectClass::Error, Some(prototype)));
        match opt_arg(args, 0) {
            None | Some(Value::Undefined) => {}
            Some(message) => {
                let message = message.clone();
                let message = self.to_string_value(&message)?;
                error
                    .0
                    .borrow_mut()
                    .set_slot("message", Property::builtin(Value::String(message)));
            }
        }
        Ok(Value::Object(error))
    }
}

fn ctor_entry(kind: ErrorKind) -> (&'static str, NativeFn, NativeFn) {
    match kind {
        ErrorKind::Base => ("Error", error_ctor, error_ctor),
        ErrorKind::Type => ("TypeError", type_error_ctor, type_error_ctor),
        ErrorKind::Range => ("RangeError", range_error_ctor, range_error_ctor),
        ErrorKind::Reference => ("ReferenceError", reference_error_ctor, reference_error_ctor),
        ErrorKind::Syntax => ("SyntaxError", syntax_error_ctor, syntax_error_ctor),
        ErrorKind::Eval => ("EvalError", eval_error_ctor, eval_error_ctor),
        ErrorKind::Uri => ("URIError", uri_error_ctor, uri_error_ctor),
    }
}

fn error_ctor(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    engine.construct_error(ErrorKind::Base, args)
}

fn type_error_ctor(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    engine.construct_error(ErrorKind::Type, args)
}

fn range_error_ctor(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    engine.construct_error(ErrorKind::Range, args)
}

fn reference_error_ctor(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    engine.construct_error(ErrorKind::Reference, args)
}

fn syntax_error_ctor(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    engine.construct_error(ErrorKind::Syntax, args)
}

fn eval_error_ctor(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    engine.construct_error(ErrorKind::Eval, args)
}

fn uri_error_ctor(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    engine.construct_error(ErrorKind::Uri, args)
}

/// "Name: message", or the bare name when the message is empty.
fn error_to_string(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    let Some(obj) = this.as_object() else {
        return Err(engine.raise_type(
            err_codes::OBJECT_EXPECTED,
            "Error.prototype.toString requires an object receiver",
        ));
    };
    let obj = obj.clone();
    let name = engine.object_get(&obj, "name", this)?;
    let name = if name.is_undefined() {
        "Error".to_string()
    } else {
        engine.to_string_value(&name)?
    };
    let message = engine.object_get(&obj, "message", this)?;
    let message = if message.is_undefined() {
        String::new()
    } else {
        engine.to_string_value(&message)?
    };
    Ok(Value::String(if message.is_empty() {
        name
    } else {
        format!("{name}: {message}")
    }))
}
