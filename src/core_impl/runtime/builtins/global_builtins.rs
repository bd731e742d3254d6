use super::*;

impl Engine {
    pub(super) fn install_global_builtins(&mut self) {
        self.add_global_value("NaN", Value::Float(f64::NAN), true);
        self.add_global_value("Infinity", Value::Float(f64::INFINITY), true);
        self.add_global_value("undefined", Value::Undefined, true);

        let eval = self.make_native("eval", 1, native_eval);
        self.state.intrinsics.eval_function = eval.clone();
        self.add_global_value("eval", Value::Object(eval), false);

        let parse_int = self.make_native("parseInt", 2, native_parse_int);
        self.add_global_value("parseInt", Value::Object(parse_int), false);
        let parse_float = self.make_native("parseFloat", 1, native_parse_float);
        self.add_global_value("parseFloat", Value::Object(parse_float), false);
        let is_nan = self.make_native("isNaN", 1, native_is_nan);
        self.add_global_value("isNaN", Value::Object(is_nan), false);
        let is_finite = self.make_native("isFinite", 1, native_is_finite);
        self.add_global_value("isFinite", Value::Object(is_finite), false);
    }
}

/// The intrinsic `eval`, reached through any call shape that is not the
/// literal `eval(...)` form: runs against the global scope.
fn native_eval(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let scope = engine.state.global_scope.clone();
    engine.eval_in_scope(args, &scope)
}

fn native_parse_int(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let text = arg(args, 0);
    let text = engine.to_string_value(&text)?;
    let radix = match opt_arg(args, 1) {
        None | Some(Value::Undefined) => None,
        Some(value) => {
            let value = value.clone();
            Some(engine.to_int32_value(&value)?)
        }
    };
    Ok(Value::from_f64(parse_int_prefix(&text, radix)))
}

fn native_parse_float(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let text = arg(args, 0);
    let text = engine.to_string_value(&text)?;
    Ok(Value::from_f64(parse_float_prefix(&text)))
}

fn native_is_nan(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let value = arg(args, 0);
    let number = engine.to_number(&value)?;
    Ok(Value::Bool(number.is_nan()))
}

fn native_is_finite(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let value = arg(args, 0);
    let number = engine.to_number(&value)?;
    Ok(Value::Bool(number.is_finite()))
}
