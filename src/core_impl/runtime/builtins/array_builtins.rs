use super::*;

impl Engine {
    pub(super) fn install_array_builtins(&mut self) {
        let prototype = self.state.intrinsics.array_prototype.clone();
        let ctor = self.add_constructor("Array", 1, array_call, array_construct, &prototype);
        self.add_method(&ctor, "isArray", 1, array_is_array);

        self.add_method(&prototype, "push", 1, array_push);
        self.add_method(&prototype, "pop", 0, array_pop);
        self.add_method(&prototype, "shift", 0, array_shift);
        self.add_method(&prototype, "unshift", 1, array_unshift);
        self.add_method(&prototype, "join", 1, array_join);
        self.add_method(&prototype, "toString", 0, array_to_string);
        self.add_method(&prototype, "concat", 1, array_concat);
        self.add_method(&prototype, "slice", 2, array_slice);
        self.add_method(&prototype, "splice", 2, array_splice);
        self.add_method(&prototype, "reverse", 0, array_reverse);
        self.add_method(&prototype, "indexOf", 1, array_index_of);
        self.add_method(&prototype, "lastIndexOf", 1, array_last_index_of);
        self.add_method(&prototype, "forEach", 1, array_for_each);
        self.add_method(&prototype, "map", 1, array_map);
        self.add_method(&prototype, "filter", 1, array_filter);
        self.add_method(&prototype, "every", 1, array_every);
        self.add_method(&prototype, "some", 1, array_some);
        self.add_method(&prototype, "reduce", 1, array_reduce);
        self.add_method(&prototype, "sort", 1, array_sort);
    }

    fn element(&mut self, obj: &ObjectHandle, index: u32) -> Result<Value> {
        let receiver = Value::Object(obj.clone());
        self.object_get(obj, &index.to_string(), &receiver)
    }

    fn set_element(&mut self, obj: &ObjectHandle, index: u32, value: Value) -> Result<()> {
        self.object_set(obj, &index.to_string(), value)
    }

    fn has_element(&mut self, obj: &ObjectHandle, index: u32) -> Result<bool> {
        self.has_property(obj, &index.to_string())
    }

    fn set_length(&mut self, obj: &ObjectHandle, length: u32) -> Result<()> {
        self.object_set(obj, "length", Value::from_f64(f64::from(length)))
    }

    fn expect_callback(&mut self, value: &Value, who: &str) -> Result<Value> {
        if value.is_callable() {
            Ok(value.clone())
        } else {
            Err(self.raise_type(
                err_codes::FUNCTION_EXPECTED,
                &format!("{who} callback is not a function"),
            ))
        }
    }
}

fn array_call(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    array_construct(engine, this, args)
}

fn array_construct(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    if args.len() == 1 {
        if let Some(number) = args[0].as_f64() {
            let length = to_uint32(number);
            if f64::from(length) != number {
                return Err(engine.raise_range(
                    err_codes::SUBSCRIPT_OUT_OF_RANGE,
                    "array length out of range",
                ));
            }
            let array = engine.make_array_object();
            if let ObjectClass::Array { length: slot } = &mut array.0.borrow_mut().class {
                *slot = length;
            }
            return Ok(Value::Object(array));
        }
    }
    Ok(Value::Object(engine.make_array_from(args.to_vec())))
}

fn array_is_array(engine: &mut Engine, _this: &Value, args: &[Value]) -> Result<Value> {
    let _ = engine;
    let is_array = matches!(
        arg(args, 0),
        Value::Object(obj) if matches!(obj.0.borrow().class, ObjectClass::Array { .. })
    );
    Ok(Value::Bool(is_array))
}

fn array_push(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let (obj, mut length) = engine.array_like(this)?;
    for value in args {
        engine.set_element(&obj, length, value.clone())?;
        length += 1;
    }
    engine.set_length(&obj, length)?;
    Ok(Value::from_f64(f64::from(length)))
}

fn array_pop(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let _ = args;
    let (obj, length) = engine.array_like(this)?;
    if length == 0 {
        engine.set_length(&obj, 0)?;
        return Ok(Value::Undefined);
    }
    let last = length - 1;
    let value = engine.element(&obj, last)?;
    engine.object_delete(&obj, &last.to_string())?;
    engine.set_length(&obj, last)?;
    Ok(value)
}

fn array_shift(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let _ = args;
    let (obj, length) = engine.array_like(this)?;
    if length == 0 {
        engine.set_length(&obj, 0)?;
        return Ok(Value::Undefined);
    }
    let first = engine.element(&obj, 0)?;
    for index in 1..length {
        if engine.has_element(&obj, index)? {
            let value = engine.element(&obj, index)?;
            engine.set_element(&obj, index - 1, value)?;
        } else {
            engine.object_delete(&obj, &(index - 1).to_string())?;
        }
    }
    engine.object_delete(&obj, &(length - 1).to_string())?;
    engine.set_length(&obj, length - 1)?;
    Ok(first)
}

fn array_unshift(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let (obj, length) = engine.array_like(this)?;
    let shift = args.len() as u32;
    for index in (0..length).rev() {
        if engine.has_element(&obj, index)? {
            let value = engine.element(&obj, index)?;
            engine.set_element(&obj, index + shift, value)?;
        } else {
            engine.object_delete(&obj, &(index + shift).to_string())?;
        }
    }
    for (offset, value) in args.iter().enumerate() {
        engine.set_element(&obj, offset as u32, value.clone())?;
    }
    engine.set_length(&obj, length + shift)?;
    Ok(Value::from_f64(f64::from(length + shift)))
}

/// Holes, `null`, and `undefined` all render empty in a join.
fn array_join(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let (obj, length) = engine.array_like(this)?;
    let separator = match opt_arg(args, 0) {
        None | Some(Value::Undefined) => ",".to_string(),
        Some(value) => {
            let value = value.clone();
            engine.to_string_value(&value)?
        }
    };
    let mut out = String::new();
    for index in 0..length {
        if index > 0 {
            out.push_str(&separator);
        }
        let value = engine.element(&obj, index)?;
        if !matches!(value, Value::Undefined | Value::Null) {
            out.push_str(&engine.to_string_value(&value)?);
        }
    }
    Ok(Value::String(out))
}

fn array_to_string(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    array_join(engine, this, &[])
}

fn array_concat(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let out = engine.make_array_object();
    let mut cursor = 0u32;
    let this_obj = engine.to_object_value(this)?;
    let mut sources = vec![Value::Object(this_obj)];
    sources.extend_from_slice(args);

    for source in sources {
        let spread = matches!(
            &source,
            Value::Object(obj) if matches!(obj.0.borrow().class, ObjectClass::Array { .. })
        );
        if spread {
            let (src, length) = engine.array_like(&source)?;
            for index in 0..length {
                if engine.has_element(&src, index)? {
                    let value = engine.element(&src, index)?;
                    engine.set_element(&out, cursor, value)?;
                }
                cursor += 1;
            }
        } else {
            engine.set_element(&out, cursor, source)?;
            cursor += 1;
        }
    }
    if let ObjectClass::Array { length } = &mut out.0.borrow_mut().class {
        *length = cursor;
    }
    Ok(Value::Object(out))
}

fn normalize_span(value: f64, length: u32) -> u32 {
    if value.is_nan() {
        return 0;
    }
    if value < 0.0 {
        let from_end = f64::from(length) + value;
        if from_end < 0.0 { 0 } else { from_end as u32 }
    } else if value > f64::from(length) {
        length
    } else {
        value as u32
    }
}

fn array_slice(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let (obj, length) = engine.array_like(this)?;
    let start = match opt_arg(args, 0) {
        None | Some(Value::Undefined) => 0,
        Some(value) => {
            let value = value.clone();
            normalize_span(engine.to_number(&value)?, length)
        }
    };
    let end = match opt_arg(args, 1) {
        None | Some(Value::Undefined) => length,
        Some(value) => {
            let value = value.clone();
            normalize_span(engine.to_number(&value)?, length)
        }
    };
    let out = engine.make_array_object();
    let mut cursor = 0u32;
    for index in start..end.max(start) {
        if engine.has_element(&obj, index)? {
            let value = engine.element(&obj, index)?;
            engine.set_element(&out, cursor, value)?;
        }
        cursor += 1;
    }
    if let ObjectClass::Array { length } = &mut out.0.borrow_mut().class {
        *length = cursor;
    }
    Ok(Value::Object(out))
}

fn array_splice(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let (obj, length) = engine.array_like(this)?;
    let start = match opt_arg(args, 0) {
        None => 0,
        Some(value) => {
            let value = value.clone();
            normalize_span(engine.to_number(&value)?, length)
        }
    };
    let delete_count = match opt_arg(args, 1) {
        None => length - start,
        Some(value) => {
            let value = value.clone();
            let count = engine.to_number(&value)?;
            let max = f64::from(length - start);
            if count.is_nan() || count < 0.0 {
                0
            } else if count > max {
                length - start
            } else {
                count as u32
            }
        }
    };
    let inserted: Vec<Value> = args.iter().skip(2).cloned().collect();

    let removed = engine.make_array_object();
    for offset in 0..delete_count {
        if engine.has_element(&obj, start + offset)? {
            let value = engine.element(&obj, start + offset)?;
            engine.set_element(&removed, offset, value)?;
        }
    }
    if let ObjectClass::Array { length } = &mut removed.0.borrow_mut().class {
        *length = delete_count;
    }

    let insert_count = inserted.len() as u32;
    let tail = length - start - delete_count;
    if insert_count < delete_count {
        for offset in 0..tail {
            let from = start + delete_count + offset;
            let to = start + insert_count + offset;
            if engine.has_element(&obj, from)? {
                let value = engine.element(&obj, from)?;
                engine.set_element(&obj, to, value)?;
            } else {
                engine.object_delete(&obj, &to.to_string())?;
            }
        }
        for index in (length - delete_count + insert_count)..length {
            engine.object_delete(&obj, &index.to_string())?;
        }
    } else if insert_count > delete_count {
        for offset in (0..tail).rev() {
            let from = start + delete_count + offset;
            let to = start + insert_count + offset;
            if engine.has_element(&obj, from)? {
                let value = engine.element(&obj, from)?;
                engine.set_element(&obj, to, value)?;
            } else {
                engine.object_delete(&obj, &to.to_string())?;
            }
        }
    }
    for (offset, value) in inserted.into_iter().enumerate() {
        engine.set_element(&obj, start + offset as u32, value)?;
    }
    engine.set_length(&obj, length - delete_count + insert_count)?;
    Ok(Value::Object(removed))
}

fn array_reverse(engine: &mut Engine, this: &Value, _args: &[Value]) -> Result<Value> {
    let (obj, length) = engine.array_like(this)?;
    let mut low = 0u32;
    let mut high = length.saturating_sub(1);
    while low < high {
        let low_present = engine.has_element(&obj, low)?;
        let high_present = engine.has_element(&obj, high)?;
        let low_value = engine.element(&obj, low)?;
        let high_value = engine.element(&obj, high)?;
        if high_present {
            engine.set_element(&obj, low, high_value)?;
        } else {
            engine.object_delete(&obj, &low.to_string())?;
        }
        if low_present {
            engine.set_element(&obj, high, low_value)?;
        } else {
            engine.object_delete(&obj, &high.to_string())?;
        }
        low += 1;
        high -= 1;
    }
    Ok(this.clone())
}

fn array_index_of(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let (obj, length) = engine.array_like(this)?;
    let needle = arg(args, 0);
    let start = match opt_arg(args, 1) {
        None | Some(Value::Undefined) => 0,
        Some(value) => {
            let value = value.clone();
            normalize_span(engine.to_number(&value)?, length)
        }
    };
    for index in start..length {
        if engine.has_element(&obj, index)? {
            let value = engine.element(&obj, index)?;
            if engine.strict_equals(&value, &needle) {
                return Ok(Value::from_f64(f64::from(index)));
            }
        }
    }
    Ok(Value::Number(-1))
}

fn array_last_index_of(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let (obj, length) = engine.array_like(this)?;
    if length == 0 {
        return Ok(Value::Number(-1));
    }
    let needle = arg(args, 0);
    let start = match opt_arg(args, 1) {
        None | Some(Value::Undefined) => length - 1,
        Some(value) => {
            let value = value.clone();
            let number = engine.to_number(&value)?;
            if number.is_nan() {
                length - 1
            } else if number < 0.0 {
                let from_end = f64::from(length) + number;
                if from_end < 0.0 {
                    return Ok(Value::Number(-1));
                }
                from_end as u32
            } else if number >= f64::from(length) {
                length - 1
            } else {
                number as u32
            }
        }
    };
    for index in (0..=start).rev() {
        if engine.has_element(&obj, index)? {
            let value = engine.element(&obj, index)?;
            if engine.strict_equals(&value, &needle) {
                return Ok(Value::from_f64(f64::from(index)));
            }
        }
    }
    Ok(Value::Number(-1))
}

fn array_for_each(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let (obj, length) = engine.array_like(this)?;
    let callback = arg(args, 0);
    let callback = engine.expect_callback(&callback, "forEach")?;
    let this_arg = arg(args, 1);
    for index in 0..length {
        if engine.has_element(&obj, index)? {
            let value = engine.element(&obj, index)?;
            let index_value = Value::from_f64(f64::from(index));
            engine.call_value(&callback, &this_arg, &[value, index_value, this.clone()])?;
        }
    }
    Ok(Value::Undefined)
}

fn array_map(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let (obj, length) = engine.array_like(this)?;
    let callback = arg(args, 0);
    let callback = engine.expect_callback(&callback, "map")?;
    let this_arg = arg(args, 1);
    let out = engine.make_array_object();
    for index in 0..length {
        if engine.has_element(&obj, index)? {
            let value = engine.element(&obj, index)?;
            let index_value = Value::from_f64(f64::from(index));
            let mapped =
                engine.call_value(&callback, &this_arg, &[value, index_value, this.clone()])?;
            engine.set_element(&out, index, mapped)?;
        }
    }
    if let ObjectClass::Array { length: slot } = &mut out.0.borrow_mut().class {
        *slot = length;
    }
    Ok(Value::Object(out))
}

fn array_filter(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let (obj, length) = engine.array_like(this)?;
    let callback = arg(args, 0);
    let callback = engine.expect_callback(&callback, "filter")?;
    let this_arg = arg(args, 1);
    let out = engine.make_array_object();
    let mut cursor = 0u32;
    for index in 0..length {
        if engine.has_element(&obj, index)? {
            let value = engine.element(&obj, index)?;
            let index_value = Value::from_f64(f64::from(index));
            let keep = engine.call_value(
                &callback,
                &this_arg,
                &[value.clone(), index_value, this.clone()],
            )?;
            if keep.truthy() {
                engine.set_element(&out, cursor, value)?;
                cursor += 1;
            }
        }
    }
    Ok(Value::Object(out))
}

fn array_every(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let (obj, length) = engine.array_like(this)?;
    let callback = arg(args, 0);
    let callback = engine.expect_callback(&callback, "every")?;
    let this_arg = arg(args, 1);
    for index in 0..length {
        if engine.has_element(&obj, index)? {
            let value = engine.element(&obj, index)?;
            let index_value = Value::from_f64(f64::from(index));
            let passed =
                engine.call_value(&callback, &this_arg, &[value, index_value, this.clone()])?;
            if !passed.truthy() {
                return Ok(Value::Bool(false));
            }
        }
    }
    Ok(Value::Bool(true))
}

fn array_some(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let (obj, length) = engine.array_like(this)?;
    let callback = arg(args, 0);
    let callback = engine.expect_callback(&callback, "some")?;
    let this_arg = arg(args, 1);
    for index in 0..length {
        if engine.has_element(&obj, index)? {
            let value = engine.element(&obj, index)?;
            let index_value = Value::from_f64(f64::from(index));
            let passed =
                engine.call_value(&callback, &this_arg, &[value, index_value, this.clone()])?;
            if passed.truthy() {
                return Ok(Value::Bool(true));
            }
        }
    }
    Ok(Value::Bool(false))
}

fn array_reduce(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let (obj, length) = engine.array_like(this)?;
    let callback = arg(args, 0);
    let callback = engine.expect_callback(&callback, "reduce")?;

    let mut index = 0u32;
    let mut accumulator = match opt_arg(args, 1) {
        Some(value) => value.clone(),
        None => loop {
            if index >= length {
                return Err(engine.raise_type(
                    err_codes::OBJECT_EXPECTED,
                    "reduce of empty array with no initial value",
                ));
            }
            if engine.has_element(&obj, index)? {
                let value = engine.element(&obj, index)?;
                index += 1;
                break value;
            }
            index += 1;
        },
    };

    while index < length {
        if engine.has_element(&obj, index)? {
            let value = engine.element(&obj, index)?;
            let index_value = Value::from_f64(f64::from(index));
            accumulator = engine.call_value(
                &callback,
                &Value::Undefined,
                &[accumulator, value, index_value, this.clone()],
            )?;
        }
        index += 1;
    }
    Ok(accumulator)
}

/// In-place sort: defined values ordered by the comparator (or default
/// string order), then `undefined`s, then holes.
fn array_sort(engine: &mut Engine, this: &Value, args: &[Value]) -> Result<Value> {
    let (obj, length) = engine.array_like(this)?;
    let comparator = match opt_arg(args, 0) {
        None | Some(Value::Undefined) => None,
        Some(value) => {
            if !value.is_callable() {
                return Err(engine.raise_type(
                    err_codes::FUNCTION_EXPECTED,
                    "sort comparator is not a function",
                ));
            }
            Some(value.clone())
        }
    };

    let mut defined = Vec::new();
    let mut undefined_count = 0u32;
    let mut hole_count = 0u32;
    for index in 0..length {
        if !engine.has_element(&obj, index)? {
            hole_count += 1;
        } else {
            let value = engine.element(&obj, index)?;
            if value.is_undefined() {
                undefined_count += 1;
            } else {
                defined.push(value);
            }
        }
    }

    // Insertion sort keeps comparator faults propagating cleanly.
    let mut sorted: Vec<Value> = Vec::with_capacity(defined.len());
    for value in defined {
        let mut position = sorted.len();
        for (index, settled) in sorted.iter().enumerate() {
            if engine.sort_compare(&value, settled, comparator.as_ref())? < 0.0 {
                position = index;
                break;
            }
        }
        sorted.insert(position, value);
    }

    for (index, value) in sorted.iter().enumerate() {
        engine.set_element(&obj, index as u32, value.clone())?;
    }
    let mut cursor = sorted.len() as u32;
    for _ in 0..undefined_count {
        engine.set_element(&obj, cursor, Value::Undefined)?;
        cursor += 1;
    }
    for _ in 0..hole_count {
        engine.object_delete(&obj, &cursor.to_string())?;
        cursor += 1;
    }
    Ok(this.clone())
}

impl Engine {
    fn sort_compare(
        &mut self,
        left: &Value,
        right: &Value,
        comparator: Option<&Value>,
    ) -> Result<f64> {
        match comparator {
            Some(callback) => {
                let result =
                    self.call_value(callback, &Value::Undefined, &[left.clone(), right.clone()])?;
                self.to_number(&result)
            }
            None => {
                let a = self.to_string_value(left)?;
                let b = self.to_string_value(right)?;
                Ok(match a.cmp(&b) {
                    std::cmp::Ordering::Less => -1.0,
                    std::cmp::Ordering::Equal => 0.0,
                    std::cmp::Ordering::Greater => 1.0,
                })
            }
        }
    }
}
