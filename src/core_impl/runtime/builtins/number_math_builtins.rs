use super::*;

impl Engine {
    pub(super) fn install_number_builtins(&mut self) {
        let prototype = self.state.intrinsics.number_prototype.clone();
        let ctor = self.add_constructor("Number", 1, number_call, number_construct, &prototype);
        {
            let mut record = ctor.0.borrow_mut();
            record.set_slot("MAX_VALUE", Property::frozen(Value::Float(f64::MAX)));
            record.set_slot("MIN_VALUE", Property::frozen(Value::Float(f64::MIN_POSITIVE)));
            record.set_slot("NaN", Property::frozen(Value::Float(f64::NAN)));
            record.set_slot(
                "POSITIVE_INFINITY",
                Property::frozen(Value::Float(f64::INFINITY)),
            );
            record.set_slot(
                "NEGATIVE_INFINITY",
                Property::frozen(Value::Float(f64::NEG_INFINITY)),
            );
        }

        self.add_method(&prototype, "toString", 1, number_to_string);
        self.add_method(&prototype, "toLocaleString", 0, number_to_string);
        self.add_method(&prototype, "valueOf", 0, number_value_of);
        self.add_method(&prototype, "toFixed", 1, number_to_fixed);
    }

    pub(super) fn install_boolean_builtins(&mut self) {
        let prototype = self.state.intrinsics.boolean_prototype.clone();
        self.add_constructor("Boolean", 1, boolean_call, boolean_construct, &prototype);
        self.add_method(&prototype, "toString", 0, boolean_to_string);
        self.add_method(&prototype, "valueOf", 0, boolean_value_of);
    }

    pub(super) fn install_math_builtins(&mut self) {
        let math = ObjectHandle::new(ObjectRecord::new(
            ObjectClass::Math,
            Some(self.state.intrinsics.object_prototype.clone()),
        ));
        {
            let mut record = math.0.borrow_mut();
            record.set_slot("E", Property::frozen(Value::Float(std::f64::consts::E)));
            record.set_slot("LN2", Property::frozen(Value::Float(std::f64::consts::LN_2)));
            record.set_slot(
                "LN10",
                Property::frozen(Value::Float(std::f64::consts::LN_10)),
            );
            record.set_slot(
                "LOG2E",
                Property::frozen(Value::Float(std::f64::consts::LOG2_E)),
            );
            record.set_slot(
                "LOG10E",
                Property::frozen(Value::Float(std::f64::consts::LOG10_E)),
            );
            record.set_slot("PI", Property::frozen(Value::Float(std::f64::consts::PI)));
            record.set_slot(
                "SQRT1_2",
                Property::frozen(Value::Float(std::f64::consts::FRAC_1_SQRT_2)),
            );
            record.set_slot(
                "SQRT2",
                Property::frozen(Value::Float(std::f64::consts::SQRT_2)),
            );
        }

        self.add_method(&math, "abs", 1, math_abs);
        self.add_method(&math, "ceil", 1, math_ceil);
        self.add_method(&math, "floor", 1, math_floor);
        self.add_method(&math, "round", 1, math_round);
        self.add_method(&math, "max", 2, math_max);
        self.add_method(&math, "min", 2, math_min);
        self.add_method(&math, "pow", 2, math_pow);
        self.add_method(&math, "sqrt", 1, math_sqrt);
        self.add_method(&math, "exp", 1, math_exp);
        self.add_method(&math, "log", 1, math_log);
        self.add_method(&math, "sin", 1, math_sin);
        self.add_method(&math, "cos", 1, math_cos);
        self.add_method(&math, "tan", 1, math_tan);
        self.add_method(&math, "atan", 1, math_atan);
        self.add_method(&math, "atan2", 2, math_atan2);
        self.add_method(&math, "random", 0, math_random);

        self.add_global_value("Math", Value::Object(math), false);
    }

    /// Strict receiver for Number.prototype methods.
    fn this_number(&mut self, this: &Value) -> Result<f64> {
        match this {
            Value::Number(v) => Ok(f64::from(*v)),
            Value::Float(v) => Ok(*v),
            Value::Object(obj) => {
                let inner = match obj.0.borrow().class {
                    ObjectClass::NumberWrapper(v) => Some(v),
                    _ => None,
                };
                match inner {
                    Some(v) => Ok(v),
                    None => Err(self.raise_type(
                        err_codes::NUMBER_EXPECTED,
                        "Number method called on incompatible receiver",
                    )),
                }
            }
            _ => Err(self.raise_type(
                err_codes::NUMBER_EXPECTED,
                "Number method called on incompatible receiver",
            )),
        }
    }

    fn this_boolean(&mut self, this: &Value) -> Result<bool> {
        match this {
            Value::Bool(v) => Ok(*v),
            Value::Object(obj) => {
                let inner = match obj.0.borrow().class {
                    ObjectClass::BooleanWrapper(v) => Some(v),
                    _ => None,
                };
                match inner {
                    Some(v) => Ok(v),
                    None => Err(self.raise_type(
                        err_codes::BOOLEAN_EXPECTED,
                        "Boolean method called on incompatible receiver",
                    )),
                }
            }
            _ => Err(self.raise_type(
                err_codes::BOOLEAN_EXPECTED,
                "Boolean method called on incompatible receiver",
            )),
        }
    }

    fn math_arg(&mut self, args: &[Value], index: usize) -> Result<f64> {
        let value = arg(args, index);
        self.to_number(&value)
    }
}

fn number_call(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    match opt_arg(args, 0) {
        None => Ok(Value::Number(0)),
        Some(value) => {
            let value = value.clone();
            Ok(Value::from_f64(engine.to_number(&value)?))
        }
    }
}

fn number_construct(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let inner = match opt_arg(args, 0) {
        None => 0.0,
        Some(value) => {
            let value = value.clone();
            engine.to_number(&value)?
        }
    };
    let proto = engine.state.intrinsics.number_prototype.clone();
    Ok(Value::Object(ObjectHandle::new(ObjectRecord::new(
        ObjectClass::NumberWrapper(inner),
        Some(proto),
    ))))
}

fn number_to_string(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let value = engine.this_number(this)?;
    let radix = match opt_arg(args, 0) {
        None | Some(Value::Undefined) => 10,
        Some(radix) => {
            let radix = radix.clone();
            engine.to_int32_value(&radix)?
        }
    };
    if !(2..=36).contains(&radix) {
        return Err(engine.raise_range(
            err_codes::FRACTION_DIGITS_OUT_OF_RANGE,
            "radix must be between 2 and 36",
        ));
    }
    Ok(Value::String(format_float_radix(value, radix as u32)))
}

fn number_value_of(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    let value = engine.this_number(this)?;
    Ok(Value::from_f64(value))
}

fn number_to_fixed(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let value = engine.this_number(this)?;
    let digits = match opt_arg(args, 0) {
        None | Some(Value::Undefined) => 0,
        Some(digits) => {
            let digits = digits.clone();
            engine.to_int32_value(&digits)?
        }
    };
    if !(0..=20).contains(&digits) {
        return Err(engine.raise_range(
            err_codes::FRACTION_DIGITS_OUT_OF_RANGE,
            "fraction digits must be between 0 and 20",
        ));
    }
    if value.is_nan() {
        return Ok(Value::string("NaN"));
    }
    if value.abs() >= 1e21 {
        return Ok(Value::String(format_float(value)));
    }
    Ok(Value::String(format!("{:.*}", digits as usize, value)))
}

fn boolean_call(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let _ = engine;
    Ok(Value::Bool(arg(args, 0).truthy()))
}

fn boolean_construct(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let proto = engine.state.intrinsics.boolean_prototype.clone();
    Ok(Value::Object(ObjectHandle::new(ObjectRecord::new(
        ObjectClass::BooleanWrapper(arg(args, 0).truthy()),
        Some(proto),
    ))))
}

fn boolean_to_string(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    let value = engine.this_boolean(this)?;
    Ok(Value::string(if value { "true" } else { "false" }))
}

fn boolean_value_of(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    let value = engine.this_boolean(this)?;
    Ok(Value::Bool(value))
}

fn math_abs(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let value = engine.math_arg(args, 0)?;
    Ok(Value::from_f64(value.abs()))
}

fn math_ceil(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let value = engine.math_arg(args, 0)?;
    Ok(Value::from_f64(value.ceil()))
}

fn math_floor(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let value = engine.math_arg(args, 0)?;
    Ok(Value::from_f64(value.floor()))
}

fn math_round(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let value = engine.math_arg(args, 0)?;
    // Halfway cases round toward positive infinity.
    Ok(Value::from_f64((value + 0.5).floor()))
}

fn math_max(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let mut best = f64::NEG_INFINITY;
    for value in args {
        let number = engine.to_number(value)?;
        if number.is_nan() {
            return Ok(Value::Float(f64::NAN));
        }
        if number > best {
            best = number;
        }
    }
    Ok(Value::from_f64(best))
}

fn math_min(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let mut best = f64::INFINITY;
    for value in args {
        let number = engine.to_number(value)?;
        if number.is_nan() {
            return Ok(Value::Float(f64::NAN));
        }
        if number < best {
            best = number;
        }
    }
    Ok(Value::from_f64(best))
}

fn math_pow(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let base = engine.math_arg(args, 0)?;
    let exponent = engine.math_arg(args, 1)?;
    Ok(Value::from_f64(base.powf(exponent)))
}

fn math_sqrt(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let value = engine.math_arg(args, 0)?;
    Ok(Value::from_f64(value.sqrt()))
}

fn math_exp(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let value = engine.math_arg(args, 0)?;
    Ok(Value::from_f64(value.exp()))
}

fn math_log(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let value = engine.math_arg(args, 0)?;
    Ok(Value::from_f64(value.ln()))
}

fn math_sin(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let value = engine.math_arg(args, 0)?;
    Ok(Value::from_f64(value.sin()))
}

fn math_cos(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let value = engine.math_arg(args, 0)?;
    Ok(Value::from_f64(value.cos()))
}

fn math_tan(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let value = engine.math_arg(args, 0)?;
    Ok(Value::from_f64(value.tan()))
}

fn math_atan(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let value = engine.math_arg(args, 0)?;
    Ok(Value::from_f64(value.atan()))
}

fn math_atan2(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let y = engine.math_arg(args, 0)?;
    let x = engine.math_arg(args, 1)?;
    Ok(Value::from_f64(y.atan2(x)))
}

/// Deterministic by design: the engine promises reproducible runs, so the
/// generator is a fixed-seed xorshift stepped per call.
fn math_random(engine: &mut Engine, _this: &Value, _args: &[Value]) -> Result<Value> {
    let mut state = engine.state.random_state;
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    engine.state.random_state = state;
    let fraction = (state >> 11) as f64 / (1u64 << 53) as f64;
    Ok(Value::Float(fraction))
}
