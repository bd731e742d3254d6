use super::*;

fn to_integer(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.trunc() }
}

impl Engine {
    pub(super) fn install_string_builtins(&mut self) {
        let prototype = self.state.intrinsics.string_prototype.clone();
        let ctor = self.add_constructor("String", 1, string_call, string_construct, &prototype);
        self.add_method(&ctor, "fromCharCode", 1, string_from_char_code);

        self.add_method(&prototype, "charAt", 1, string_char_at);
        self.add_method(&prototype, "charCodeAt", 1, string_char_code_at);
        self.add_method(&prototype, "indexOf", 1, string_index_of);
        self.add_method(&prototype, "lastIndexOf", 1, string_last_index_of);
        self.add_method(&prototype, "substring", 2, string_substring);
        self.add_method(&prototype, "substr", 2, string_substr);
        self.add_method(&prototype, "slice", 2, string_slice);
        self.add_method(&prototype, "split", 2, string_split);
        self.add_method(&prototype, "replace", 2, string_replace);
        self.add_method(&prototype, "match", 1, string_match);
        self.add_method(&prototype, "search", 1, string_search);
        self.add_method(&prototype, "concat", 1, string_concat);
        self.add_method(&prototype, "toLowerCase", 0, string_to_lower);
        self.add_method(&prototype, "toUpperCase", 0, string_to_upper);
        self.add_method(&prototype, "trim", 0, string_trim);
        self.add_method(&prototype, "toString", 0, string_to_string);
        self.add_method(&prototype, "valueOf", 0, string_to_string);
    }

    /// The receiver of a generic String method, coerced the loose way.
    pub(crate) fn this_string(&mut self, this: &Value) -> Result<String> {
        match this {
            Value::Undefined | Value::Null => Err(self.raise_type(
                err_codes::OBJECT_EXPECTED,
                "String method called on null or undefined",
            )),
            Value::String(s) => Ok(s.clone()),
            Value::Object(obj) => {
                let inner = match &obj.0.borrow().class {
                    ObjectClass::StringWrapper(s) => Some(s.clone()),
                    _ => None,
                };
                match inner {
                    Some(s) => Ok(s),
                    None => self.to_string_value(this),
                }
            }
            other => self.to_string_value(other),
        }
    }

    /// Turn a pattern argument into a RegExp object plus its global flag.
    /// A string pattern is a regex source for `match`/`search` but a
    /// literal text for `replace`; `literal_text` picks the reading.
    pub(crate) fn pattern_parts(
        &mut self,
        pattern: &Value,
        literal_text: bool,
    ) -> Result<(Value, bool)> {
        if let Value::Object(obj) = pattern {
            if matches!(obj.0.borrow().class, ObjectClass::Regexp(_)) {
                let global = matches!(
                    &obj.0.borrow().class,
                    ObjectClass::Regexp(record) if record.global
                );
                return Ok((pattern.clone(), global));
            }
        }
        let source = self.to_string_value(pattern)?;
        let value = if literal_text {
            self.make_regexp(&crate::js_regex::escape(&source), "")?
        } else {
            self.make_regexp(&source, "")?
        };
        Ok((value, false))
    }
}

fn string_call(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    match opt_arg(args, 0) {
        None => Ok(Value::string("")),
        Some(value) => {
            let value = value.clone();
            Ok(Value::String(engine.to_string_value(&value)?))
        }
    }
}

fn string_construct(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let inner = match opt_arg(args, 0) {
        None => String::new(),
        Some(value) => {
            let value = value.clone();
            engine.to_string_value(&value)?
        }
    };
    let proto = engine.state.intrinsics.string_prototype.clone();
    Ok(Value::Object(ObjectHandle::new(ObjectRecord::new(
        ObjectClass::StringWrapper(inner),
        Some(proto),
    ))))
}

fn string_from_char_code(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let mut units = Vec::with_capacity(args.len());
    for value in args {
        let unit = engine.to_uint32_value(value)? as u16;
        units.push(unit);
    }
    Ok(Value::String(String::from_utf16_lossy(&units)))
}

fn string_char_at(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let s = engine.this_string(this)?;
    let position = arg(args, 0);
    let position = to_integer(engine.to_number(&position)?);
    if position < 0.0 || position >= utf16_length(&s) as f64 {
        return Ok(Value::string(""));
    }
    Ok(Value::String(utf16_slice(
        &s,
        position as usize,
        position as usize + 1,
    )))
}

fn string_char_code_at(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let s = engine.this_string(this)?;
    let position = arg(args, 0);
    let position = to_integer(engine.to_number(&position)?);
    if position < 0.0 || position >= utf16_length(&s) as f64 {
        return Ok(Value::Float(f64::NAN));
    }
    match utf16_unit_at(&s, position as usize) {
        Some(unit) => Ok(Value::from_f64(f64::from(unit))),
        None => Ok(Value::Float(f64::NAN)),
    }
}

fn utf16_units(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

fn find_units(haystack: &[u16], needle: &[u16], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return if from <= haystack.len() { Some(from) } else { None };
    }
    if needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len().saturating_sub(needle.len()))
        .find(|&start| &haystack[start..start + needle.len()] == needle)
}

fn string_index_of(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let s = engine.this_string(this)?;
    let search = arg(args, 0);
    let search = engine.to_string_value(&search)?;
    let from = arg(args, 1);
    let from = to_integer(engine.to_number(&from)?).max(0.0) as usize;
    let haystack = utf16_units(&s);
    let needle = utf16_units(&search);
    match find_units(&haystack, &needle, from.min(haystack.len())) {
        Some(index) => Ok(Value::from_f64(index as f64)),
        None => Ok(Value::Number(-1)),
    }
}

fn string_last_index_of(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let s = engine.this_string(this)?;
    let search = arg(args, 0);
    let search = engine.to_string_value(&search)?;
    let haystack = utf16_units(&s);
    let needle = utf16_units(&search);
    let limit = match opt_arg(args, 1) {
        None | Some(Value::Undefined) => haystack.len(),
        Some(value) => {
            let value = value.clone();
            let number = engine.to_number(&value)?;
            if number.is_nan() {
                haystack.len()
            } else {
                to_integer(number).max(0.0) as usize
            }
        }
    };
    let mut best = None;
    let mut from = 0usize;
    while let Some(found) = find_units(&haystack, &needle, from) {
        if found > limit {
            break;
        }
        best = Some(found);
        from = found + 1;
    }
    match best {
        Some(index) => Ok(Value::from_f64(index as f64)),
        None => Ok(Value::Number(-1)),
    }
}

/// Arguments normalize then swap if reversed: `"abcd".substring(3, 1)`
/// is the same slice as `(1, 3)`.
fn string_substring(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let s = engine.this_string(this)?;
    let length = utf16_length(&s) as f64;
    let start = arg(args, 0);
    let mut start = to_integer(engine.to_number(&start)?).clamp(0.0, length);
    let mut end = match opt_arg(args, 1) {
        None | Some(Value::Undefined) => length,
        Some(value) => {
            let value = value.clone();
            to_integer(engine.to_number(&value)?).clamp(0.0, length)
        }
    };
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }
    Ok(Value::String(utf16_slice(&s, start as usize, end as usize)))
}

fn string_substr(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let s = engine.this_string(this)?;
    let length = utf16_length(&s) as f64;
    let start = arg(args, 0);
    let start = to_integer(engine.to_number(&start)?);
    let start = if start < 0.0 {
        (length + start).max(0.0)
    } else {
        start.min(length)
    };
    let count = match opt_arg(args, 1) {
        None | Some(Value::Undefined) => length - start,
        Some(value) => {
            let value = value.clone();
            to_integer(engine.to_number(&value)?).clamp(0.0, length - start)
        }
    };
    Ok(Value::String(utf16_slice(
        &s,
        start as usize,
        (start + count) as usize,
    )))
}

fn string_slice(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let s = engine.this_string(this)?;
    let length = utf16_length(&s) as f64;
    let normalize = |value: f64| -> f64 {
        if value < 0.0 {
            (length + value).max(0.0)
        } else {
            value.min(length)
        }
    };
    let start = arg(args, 0);
    let start = normalize(to_integer(engine.to_number(&start)?));
    let end = match opt_arg(args, 1) {
        None | Some(Value::Undefined) => length,
        Some(value) => {
            let value = value.clone();
            normalize(to_integer(engine.to_number(&value)?))
        }
    };
    if start >= end {
        return Ok(Value::string(""));
    }
    Ok(Value::String(utf16_slice(&s, start as usize, end as usize)))
}

fn string_split(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let s = engine.this_string(this)?;
    let limit = match opt_arg(args, 1) {
        None | Some(Value::Undefined) => u32::MAX,
        Some(value) => {
            let value = value.clone();
            engine.to_uint32_value(&value)?
        }
    };

    let separator = opt_arg(args, 0).cloned();
    let mut parts: Vec<Value> = Vec::new();

    match separator {
        None | Some(Value::Undefined) => parts.push(Value::String(s.clone())),
        Some(Value::Object(obj))
            if matches!(obj.0.borrow().class, ObjectClass::Regexp(_)) =>
        {
            let regex = engine.regexp_backend(&obj)?;
            let mut last = 0usize;
            let mut position = 0usize;
            while position <= s.len() {
                let Some(captures) = regex
                    .captures_from_pos(&s, position)
                    .map_err(|err| engine.raise_syntax(&err.to_string()))?
                else {
                    break;
                };
                let whole = captures.whole().clone();
                if whole.end() == whole.start() && whole.start() == last {
                    position = next_char_boundary(&s, position);
                    continue;
                }
                parts.push(Value::string(&s[last..whole.start()]));
                for group in 1..captures.len() {
                    parts.push(match captures.get(group) {
                        Some(matched) => Value::string(matched.as_str()),
                        None => Value::Undefined,
                    });
                }
                last = whole.end();
                position = if whole.end() == whole.start() {
                    next_char_boundary(&s, whole.end())
                } else {
                    whole.end()
                };
            }
            parts.push(Value::string(&s[last..]));
        }
        Some(separator) => {
            let separator = engine.to_string_value(&separator)?;
            if separator.is_empty() {
                let units = utf16_units(&s);
                for unit in units {
                    parts.push(Value::String(String::from_utf16_lossy(&[unit])));
                }
            } else {
                for piece in s.split(separator.as_str()) {
                    parts.push(Value::string(piece));
                }
            }
        }
    }

    parts.truncate(limit as usize);
    Ok(Value::Object(engine.make_array_from(parts)))
}

fn next_char_boundary(s: &str, from: usize) -> usize {
    let mut next = from + 1;
    while next < s.len() && !s.is_char_boundary(next) {
        next += 1;
    }
    next
}

/// `$&`, `$1`..`$99`, `$$`, `` $` ``, `$'` substitutions.
fn expand_replacement(
    template: &str,
    input: &str,
    captures: &crate::js_regex::Captures,
) -> String {
    let whole = captures.whole();
    let mut out = String::new();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                out.push('$');
                chars.next();
            }
            Some('&') => {
                out.push_str(whole.as_str());
                chars.next();
            }
            Some('`') => {
                out.push_str(&input[..whole.start()]);
                chars.next();
            }
            Some('\'') => {
                out.push_str(&input[whole.end()..]);
                chars.next();
            }
            Some(d) if d.is_ascii_digit() => {
                let mut number = d.to_digit(10).unwrap_or(0) as usize;
                chars.next();
                if let Some(d2) = chars.peek().copied() {
                    if d2.is_ascii_digit() {
                        let two = number * 10 + d2.to_digit(10).unwrap_or(0) as usize;
                        if two < captures.len() {
                            number = two;
                            chars.next();
                        }
                    }
                }
                if number >= 1 && number < captures.len() {
                    if let Some(group) = captures.get(number) {
                        out.push_str(group.as_str());
                    }
                } else {
                    out.push('$');
                    out.push_str(&number.to_string());
                }
            }
            _ => out.push('$'),
        }
    }
    out
}

fn string_replace(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let s = engine.this_string(this)?;
    let pattern = arg(args, 0);
    let (regex_value, global) = engine.pattern_parts(&pattern, true)?;
    let Some(regex_obj) = regex_value.as_object().cloned() else {
        return Ok(Value::String(s));
    };
    let regex = engine.regexp_backend(&regex_obj)?;
    let replacement = arg(args, 1);

    let mut out = String::new();
    let mut last = 0usize;
    let mut position = 0usize;
    loop {
        let Some(captures) = regex
            .captures_from_pos(&s, position)
            .map_err(|err| engine.raise_syntax(&err.to_string()))?
        else {
            break;
        };
        let whole = captures.whole().clone();
        out.push_str(&s[last..whole.start()]);

        if replacement.is_callable() {
            let mut call_args: Vec<Value> = Vec::with_capacity(captures.len() + 2);
            for group in 0..captures.len() {
                call_args.push(match captures.get(group) {
                    Some(matched) => Value::string(matched.as_str()),
                    None => Value::Undefined,
                });
            }
            call_args.push(Value::from_f64(
                utf16_index_at_byte(&s, whole.start()) as f64
            ));
            call_args.push(Value::string(&s));
            let replaced = engine.call_value(&replacement, &Value::Undefined, &call_args)?;
            out.push_str(&engine.to_string_value(&replaced)?);
        } else {
            let template = engine.to_string_value(&replacement)?;
            out.push_str(&expand_replacement(&template, &s, &captures));
        }

        last = whole.end();
        position = if whole.end() == whole.start() {
            next_char_boundary(&s, whole.end())
        } else {
            whole.end()
        };
        if !global || position > s.len() {
            break;
        }
    }
    out.push_str(&s[last..]);
    Ok(Value::String(out))
}

fn string_match(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let s = engine.this_string(this)?;
    let pattern = arg(args, 0);
    let (regex_value, global) = engine.pattern_parts(&pattern, false)?;
    let Some(regex_obj) = regex_value.as_object().cloned() else {
        return Ok(Value::Null);
    };

    if !global {
        let subject = Value::string(&s);
        return engine.regexp_exec(&regex_obj, &subject);
    }

    let regex = engine.regexp_backend(&regex_obj)?;
    let matches = regex
        .find_all(&s)
        .map_err(|err| engine.raise_syntax(&err.to_string()))?;
    if matches.is_empty() {
        return Ok(Value::Null);
    }
    let values = matches
        .into_iter()
        .map(|matched| Value::string(matched.as_str()))
        .collect();
    Ok(Value::Object(engine.make_array_from(values)))
}

fn string_search(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let s = engine.this_string(this)?;
    let pattern = arg(args, 0);
    let (regex_value, _) = engine.pattern_parts(&pattern, false)?;
    let Some(regex_obj) = regex_value.as_object().cloned() else {
        return Ok(Value::Number(-1));
    };
    let regex = engine.regexp_backend(&regex_obj)?;
    match regex
        .find(&s)
        .map_err(|err| engine.raise_syntax(&err.to_string()))?
    {
        Some(matched) => Ok(Value::from_f64(
            utf16_index_at_byte(&s, matched.start()) as f64
        )),
        None => Ok(Value::Number(-1)),
    }
}

fn string_concat(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let mut out = engine.this_string(this)?;
    for value in args {
        out.push_str(&engine.to_string_value(value)?);
    }
    Ok(Value::String(out))
}

fn string_to_lower(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    let s = engine.this_string(this)?;
    Ok(Value::String(s.to_lowercase()))
}

fn string_to_upper(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    let s = engine.this_string(this)?;
    Ok(Value::String(s.to_uppercase()))
}

fn string_trim(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    let s = engine.this_string(this)?;
    Ok(Value::string(s.trim_matches(is_script_whitespace)))
}

/// Unlike the generic methods, `toString`/`valueOf` insist on an actual
/// string receiver.
fn string_to_string(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    match this {
        Value::String(s) => Ok(Value::string(s.clone())),
        Value::Object(obj) => {
            let inner = match &obj.0.borrow().class {
                ObjectClass::StringWrapper(s) => Some(s.clone()),
                _ => None,
            };
            match inner {
                Some(s) => Ok(Value::String(s)),
                None => Err(engine.raise_type(
                    err_codes::STRING_EXPECTED,
                    "String.prototype.toString requires a string",
                )),
            }
        }
        _ => Err(engine.raise_type(
            err_codes::STRING_EXPECTED,
            "String.prototype.toString requires a string",
        )),
    }
}
