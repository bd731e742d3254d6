use super::*;

use crate::js_regex::Regex;

impl Engine {
    pub(super) fn install_regexp_builtins(&mut self) {
        let prototype = self.state.intrinsics.regexp_prototype.clone();
        self.add_constructor("RegExp", 2, regexp_call, regexp_construct, &prototype);
        self.add_method(&prototype, "test", 1, regexp_test);
        self.add_method(&prototype, "exec", 1, regexp_exec_native);
        self.add_method(&prototype, "toString", 0, regexp_to_string);
    }

    /// The compiled collaborator behind a RegExp object.
    pub(crate) fn regexp_backend(&mut self, obj: &ObjectHandle) -> Result<Regex> {
        let record = obj.0.borrow();
        match &record.class {
            ObjectClass::Regexp(regexp) => Ok(regexp.regex.clone()),
            _ => {
                drop(record);
                Err(self.raise_type(
                    err_codes::REGEXP_EXPECTED,
                    "receiver is not a regular expression",
                ))
            }
        }
    }

    fn regexp_flags(&mut self, obj: &ObjectHandle) -> Result<(String, bool)> {
        let record = obj.0.borrow();
        match &record.class {
            ObjectClass::Regexp(regexp) => {
                let mut flags = String::new();
                if regexp.global {
                    flags.push('g');
                }
                if regexp.ignore_case {
                    flags.push('i');
                }
                if regexp.multiline {
                    flags.push('m');
                }
                Ok((flags, regexp.global))
            }
            _ => {
                drop(record);
                Err(self.raise_type(
                    err_codes::REGEXP_EXPECTED,
                    "receiver is not a regular expression",
                ))
            }
        }
    }

    /// The exec protocol: global expressions resume from `lastIndex` and
    /// park it after the match; a miss resets it.
    pub(crate) fn regexp_exec(&mut self, obj: &ObjectHandle, input: &Value) -> Result<Value> {
        let subject = self.to_string_value(input)?;
        let regex = self.regexp_backend(obj)?;
        let (_, global) = self.regexp_flags(obj)?;

        let start_units = if global {
            let receiver = Value::Object(obj.clone());
            let last_index = self.object_get(obj, "lastIndex", &receiver)?;
            let last_index = self.to_number(&last_index)?;
            if last_index < 0.0 || last_index > utf16_length(&subject) as f64 {
                self.object_set(obj, "lastIndex", Value::Number(0))?;
                return Ok(Value::Null);
            }
            last_index as usize
        } else {
            0
        };

        let start_byte = byte_index_at_utf16(&subject, start_units);
        let captures = regex
            .captures_from_pos(&subject, start_byte)
            .map_err(|err| self.raise_syntax(&err.to_string()))?;

        let Some(captures) = captures else {
            if global {
                self.object_set(obj, "lastIndex", Value::Number(0))?;
            }
            return Ok(Value::Null);
        };

        if global {
            let end_units = utf16_index_at_byte(&subject, captures.whole().end());
            self.object_set(obj, "lastIndex", Value::from_f64(end_units as f64))?;
        }
        Ok(self.build_match_result(&captures, &subject))
    }

    /// `[match, group1, ...]` with `index` and `input`, the shape both
    /// `exec` and non-global `match` return.
    pub(crate) fn build_match_result(
        &mut self,
        captures: &crate::js_regex::Captures,
        subject: &str,
    ) -> Value {
        let values: Vec<Value> = (0..captures.len())
            .map(|group| match captures.get(group) {
                Some(matched) => Value::string(matched.as_str()),
                None => Value::Undefined,
            })
            .collect();
        let result = self.make_array_from(values);
        let index = utf16_index_at_byte(subject, captures.whole().start());
        {
            let mut record = result.0.borrow_mut();
            record.set_slot("index", Property::data(Value::from_f64(index as f64)));
            record.set_slot("input", Property::data(Value::string(subject)));
        }
        Value::Object(result)
    }
}

fn regexp_call(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    // RegExp(re) with no flags passes the object through unchanged.
    if let Some(Value::Object(obj)) = opt_arg(args, 0) {
        if matches!(obj.0.borrow().class, ObjectClass::Regexp(_))
            && matches!(opt_arg(args, 1), None | Some(Value::Undefined))
        {
            return Ok(args[0].clone());
        }
    }
    regexp_construct(engine, this, args)
}

fn regexp_construct(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let (source, source_flags) = match opt_arg(args, 0) {
        None | Some(Value::Undefined) => (String::new(), None),
        Some(Value::Object(obj)) => {
            let parts = match &obj.0.borrow().class {
                ObjectClass::Regexp(record) => Some((
                    record.source.clone(),
                    (record.global, record.ignore_case, record.multiline),
                )),
                _ => None,
            };
            match parts {
                Some((source, (global, ignore_case, multiline))) => {
                    let mut flags = String::new();
                    if global {
                        flags.push('g');
                    }
                    if ignore_case {
                        flags.push('i');
                    }
                    if multiline {
                        flags.push('m');
                    }
                    (source, Some(flags))
                }
                None => {
                    let value = args[0].clone();
                    (engine.to_string_value(&value)?, None)
                }
            }
        }
        Some(value) => {
            let value = value.clone();
            (engine.to_string_value(&value)?, None)
        }
    };

    let flags = match opt_arg(args, 1) {
        None | Some(Value::Undefined) => source_flags.unwrap_or_default(),
        Some(value) => {
            let value = value.clone();
            engine.to_string_value(&value)?
        }
    };
    engine.make_regexp(&source, &flags)
}

fn regexp_test(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let Some(obj) = this.as_object().cloned() else {
        return Err(engine.raise_type(
            err_codes::REGEXP_EXPECTED,
            "receiver is not a regular expression",
        ));
    };
    let input = arg(args, 0);
    let result = engine.regexp_exec(&obj, &input)?;
    Ok(Value::Bool(!matches!(result, Value::Null)))
}

fn regexp_exec_native(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let Some(obj) = this.as_object().cloned() else {
        return Err(engine.raise_type(
            err_codes::REGEXP_EXPECTED,
            "receiver is not a regular expression",
        ));
    };
    let input = arg(args, 0);
    engine.regexp_exec(&obj, &input)
}

fn regexp_to_string(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    let Some(obj) = this.as_object().cloned() else {
        return Err(engine.raise_type(
            err_codes::REGEXP_EXPECTED,
            "receiver is not a regular expression",
        ));
    };
    let source = {
        let record = obj.0.borrow();
        match &record.class {
            ObjectClass::Regexp(regexp) => regexp.source.clone(),
            _ => {
                drop(record);
                return Err(engine.raise_type(
                    err_codes::REGEXP_EXPECTED,
                    "receiver is not a regular expression",
                ));
            }
        }
    };
    let (flags, _) = engine.regexp_flags(&obj)?;
    Ok(Value::string(format!("/{source}/{flags}")))
}
