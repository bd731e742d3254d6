use super::*;

use std::rc::Rc;

impl Engine {
    pub(super) fn install_function_builtins(&mut self) {
        let prototype = self.state.intrinsics.function_prototype.clone();

        // Function.prototype is itself callable and returns undefined.
        {
            let mut record = prototype.0.borrow_mut();
            record.class = ObjectClass::Function(FunctionKind::Native(NativeFunction {
                name: "",
                length: 0,
                func: function_prototype_call,
                construct: None,
            }));
        }

        self.add_method(&prototype, "call", 1, function_call);
        self.add_method(&prototype, "apply", 2, function_apply);
        self.add_method(&prototype, "bind", 1, function_bind);
        self.add_method(&prototype, "toString", 0, function_to_string);

        self.add_constructor(
            "Function",
            1,
            function_constructor,
            function_constructor,
            &prototype,
        );
    }
}

fn function_prototype_call(_engine: &mut Engine, _this: &Value, _args: &[Value]) -> Result<Value> {
    Ok(Value::Undefined)
}

/// Compiling new code from strings goes through `eval`; the Function
/// constructor itself is not provided.
fn function_constructor(engine: &mut Engine, _this: &Value, _args: &[Value]) -> Result<Value> {
    Err(engine.raise_type(
        err_codes::FUNCTION_EXPECTED,
        "the Function constructor is not supported",
    ))
}

fn function_call(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    if !this.is_callable() {
        return Err(engine.raise_type(
            err_codes::FUNCTION_EXPECTED,
            "Function.prototype.call requires a function receiver",
        ));
    }
    let this_arg = arg(args, 0);
    let rest = if args.is_empty() { &[] } else { &args[1..] };
    engine.call_value(this, &this_arg, rest)
}

fn function_apply(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    if !this.is_callable() {
        return Err(engine.raise_type(
            err_codes::FUNCTION_EXPECTED,
            "Function.prototype.apply requires a function receiver",
        ));
    }
    let this_arg = arg(args, 0);
    let spread = match opt_arg(args, 1) {
        None | Some(Value::Undefined) | Some(Value::Null) => Vec::new(),
        Some(list) => {
            let (obj, length) = engine.array_like(list)?;
            let mut out = Vec::with_capacity(length as usize);
            let receiver = Value::Object(obj.clone());
            for index in 0..length {
                out.push(engine.object_get(&obj, &index.to_string(), &receiver)?);
            }
            out
        }
    };
    engine.call_value(this, &this_arg, &spread)
}

fn function_bind(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let Some(target) = this.as_object().filter(|obj| obj.0.borrow().is_callable()) else {
        return Err(engine.raise_type(
            err_codes::FUNCTION_EXPECTED,
            "Function.prototype.bind requires a function receiver",
        ));
    };
    let target = target.clone();
    let bound_this = arg(args, 0);
    let bound_args: Vec<Value> = args.iter().skip(1).cloned().collect();

    let target_length = {
        let receiver = Value::Object(target.clone());
        let length = engine.object_get(&target, "length", &receiver)?;
        engine.to_number(&length).unwrap_or(0.0)
    };
    let remaining = (target_length - bound_args.len() as f64).max(0.0);

    let bound = ObjectHandle::new(ObjectRecord::new(
        ObjectClass::Function(FunctionKind::Bound(Rc::new(BoundFunction {
            target,
            bound_this,
            bound_args,
        }))),
        Some(engine.state.intrinsics.function_prototype.clone()),
    ));
    bound
        .0
        .borrow_mut()
        .set_slot("length", Property::frozen(Value::from_f64(remaining)));
    Ok(Value::Object(bound))
}

fn function_to_string(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    let Some(obj) = this.as_object() else {
        return Err(engine.raise_type(
            err_codes::FUNCTION_EXPECTED,
            "Function.prototype.toString requires a function receiver",
        ));
    };
    let rendered = {
        let record = obj.0.borrow();
        match record.function_kind() {
            Some(FunctionKind::Script(script)) => {
                let params = script.def.params.join(", ");
                format!(
                    "function {}({params}) {{\n    [code]\n}}",
                    script.def.name.as_deref().unwrap_or_default()
                )
            }
            Some(FunctionKind::Native(native)) => {
                format!("function {}() {{\n    [native code]\n}}", native.name)
            }
            Some(FunctionKind::Bound(_)) => {
                "function () {\n    [native code]\n}".to_string()
            }
            None => {
                drop(record);
                return Err(engine.raise_type(
                    err_codes::FUNCTION_EXPECTED,
                    "Function.prototype.toString requires a function receiver",
                ));
            }
        }
    };
    Ok(Value::String(rendered))
}
