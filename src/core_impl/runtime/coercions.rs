use super::*;

use crate::runtime_state::err_codes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrimitiveHint {
    Default,
    Number,
    String,
}

impl Engine {
    /// ToPrimitive. Objects try `valueOf`/`toString` in hint order; an
    /// object with no usable hint method is a TypeError.
    pub(crate) fn to_primitive(&mut self, value: &Value, hint: PrimitiveHint) -> Result<Value> {
        let Some(obj) = value.as_object() else {
            return Ok(value.clone());
        };
        let obj = obj.clone();

        let methods: [&str; 2] = match hint {
            PrimitiveHint::String => ["toString", "valueOf"],
            _ => ["valueOf", "toString"],
        };
        for name in methods {
            let method = self.object_get(&obj, name, value)?;
            if method.is_callable() {
                let result = self.call_value(&method, value, &[])?;
                if result.as_object().is_none() {
                    return Ok(result);
                }
            }
        }
        Err(self.raise_type(
            err_codes::OBJECT_EXPECTED,
            "cannot convert object to primitive value",
        ))
    }

    pub(crate) fn to_number(&mut self, value: &Value) -> Result<f64> {
        match value {
            Value::Undefined => Ok(f64::NAN),
            Value::Null => Ok(0.0),
            Value::Bool(v) => Ok(if *v { 1.0 } else { 0.0 }),
            Value::Number(v) => Ok(f64::from(*v)),
            Value::Float(v) => Ok(*v),
            Value::String(v) => Ok(string_to_number(v)),
            Value::Object(_) => {
                let primitive = self.to_primitive(value, PrimitiveHint::Number)?;
                self.to_number(&primitive)
            }
        }
    }

    pub(crate) fn to_int32_value(&mut self, value: &Value) -> Result<i32> {
        Ok(to_int32(self.to_number(value)?))
    }

    pub(crate) fn to_uint32_value(&mut self, value: &Value) -> Result<u32> {
        Ok(to_uint32(self.to_number(value)?))
    }

    pub(crate) fn to_string_value(&mut self, value: &Value) -> Result<String> {
        match value {
            Value::Undefined => Ok("undefined".to_string()),
            Value::Null => Ok("null".to_string()),
            Value::Bool(v) => Ok(v.to_string()),
            Value::Number(v) => Ok(v.to_string()),
            Value::Float(v) => Ok(format_float(*v)),
            Value::String(v) => Ok(v.clone()),
            Value::Object(_) => {
                let primitive = self.to_primitive(value, PrimitiveHint::String)?;
                self.to_string_value(&primitive)
            }
        }
    }

    /// ToObject: wraps primitives, rejects null/undefined.
    pub(crate) fn to_object_value(&mut self, value: &Value) -> Result<ObjectHandle> {
        match value {
            Value::Object(obj) => Ok(obj.clone()),
            Value::String(s) => {
                let proto = self.state.intrinsics.string_prototype.clone();
                Ok(ObjectHandle::new(ObjectRecord::new(
                    ObjectClass::StringWrapper(s.clone()),
                    Some(proto),
                )))
            }
            Value::Number(_) | Value::Float(_) => {
                let number = self.to_number(value)?;
                let proto = self.state.intrinsics.number_prototype.clone();
                Ok(ObjectHandle::new(ObjectRecord::new(
                    ObjectClass::NumberWrapper(number),
                    Some(proto),
                )))
            }
            Value::Bool(v) => {
                let proto = self.state.intrinsics.boolean_prototype.clone();
                Ok(ObjectHandle::new(ObjectRecord::new(
                    ObjectClass::BooleanWrapper(*v),
                    Some(proto),
                )))
            }
            Value::Undefined | Value::Null => Err(self.raise_type(
                err_codes::OBJECT_EXPECTED,
                &format!("'{}' is not an object", self.cheap_describe(value)),
            )),
        }
    }

    fn cheap_describe(&self, value: &Value) -> &'static str {
        match value {
            Value::Undefined => "undefined",
            Value::Null => "null",
            _ => "value",
        }
    }

    /// `===`: no coercion, numeric comparison across the integer tag.
    pub(crate) fn strict_equals(&self, left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.same(b),
            _ => match (left.as_f64(), right.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// `==` with the full coercion table.
    pub(crate) fn loose_equals(&mut self, left: &Value, right: &Value) -> Result<bool> {
        if self.strict_equals(left, right) {
            return Ok(true);
        }
        match (left, right) {
            (Value::Null, Value::Undefined) | (Value::Undefined, Value::Null) => Ok(true),
            (Value::Number(_) | Value::Float(_), Value::String(_))
            | (Value::String(_), Value::Number(_) | Value::Float(_)) => {
                let a = self.to_number(left)?;
                let b = self.to_number(right)?;
                Ok(a == b)
            }
            (Value::Bool(_), _) => {
                let coerced = Value::from_f64(self.to_number(left)?);
                self.loose_equals(&coerced, right)
            }
            (_, Value::Bool(_)) => {
                let coerced = Value::from_f64(self.to_number(right)?);
                self.loose_equals(left, &coerced)
            }
            (Value::Number(_) | Value::Float(_) | Value::String(_), Value::Object(_)) => {
                let primitive = self.to_primitive(right, PrimitiveHint::Default)?;
                self.loose_equals(left, &primitive)
            }
            (Value::Object(_), Value::Number(_) | Value::Float(_) | Value::String(_)) => {
                let primitive = self.to_primitive(left, PrimitiveHint::Default)?;
                self.loose_equals(&primitive, right)
            }
            _ => Ok(false),
        }
    }

    /// The abstract relational comparison; `None` means "undefined" (a NaN
    /// operand), which every relational operator turns into `false`.
    pub(crate) fn abstract_compare(
        &mut self,
        left: &Value,
        right: &Value,
        left_first: bool,
    ) -> Result<Option<std::cmp::Ordering>> {
        let (first, second) = if left_first {
            (left, right)
        } else {
            (right, left)
        };
        let first_prim = self.to_primitive(first, PrimitiveHint::Number)?;
        let second_prim = self.to_primitive(second, PrimitiveHint::Number)?;
        let (left_prim, right_prim) = if left_first {
            (first_prim, second_prim)
        } else {
            (second_prim, first_prim)
        };

        if let (Value::String(a), Value::String(b)) = (&left_prim, &right_prim) {
            return Ok(Some(a.cmp(b)));
        }
        let a = self.to_number(&left_prim)?;
        let b = self.to_number(&right_prim)?;
        Ok(a.partial_cmp(&b))
    }
}
