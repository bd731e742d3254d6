use super::*;

use std::cell::RefCell;
use std::rc::Rc;

use crate::host::HostGet;
use crate::runtime_state::err_codes;

/// Guard for prototype-chain walks; user code can build cycles and the
/// engine must not spin on them.
const PROTO_WALK_LIMIT: usize = 1024;

/// A partial descriptor, as read out of a script-side descriptor object or
/// produced by the engine itself.
#[derive(Debug, Clone, Default)]
pub(crate) struct DescriptorInput {
    pub value: Option<Value>,
    pub get: Option<Value>,
    pub set: Option<Value>,
    pub writable: Option<bool>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
}

impl DescriptorInput {
    pub(crate) fn is_accessor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    pub(crate) fn is_data(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }
}

impl Engine {
    /// Property lookup along the prototype chain. `receiver` is the value
    /// the property was reached through; getters run with it as `this`.
    pub(crate) fn object_get(
        &mut self,
        obj: &ObjectHandle,
        key: &str,
        receiver: &Value,
    ) -> Result<Value> {
        let mut current = obj.clone();
        for _ in 0..PROTO_WALK_LIMIT {
            if let Some(value) = self.class_special_get(&current, key)? {
                return Ok(value);
            }
            let prop = current.0.borrow().get_own(key).cloned();
            match prop {
                Some(Property::Data { value, .. }) => return Ok(value),
                Some(Property::Accessor { get, .. }) => {
                    return match get {
                        Some(getter) => self.call_value(&getter, receiver, &[]),
                        None => Ok(Value::Undefined),
                    };
                }
                Some(Property::ParamAlias { scope, name }) => {
                    let value = scope
                        .borrow()
                        .bindings
                        .get(&name)
                        .map(|slot| slot.value.clone())
                        .unwrap_or(Value::Undefined);
                    return Ok(value);
                }
                None => {}
            }
            let next = self.prototype_of(&current)?;
            match next {
                Some(proto) => current = proto,
                None => break,
            }
        }
        Ok(Value::Undefined)
    }

    fn prototype_of(&mut self, obj: &ObjectHandle) -> Result<Option<ObjectHandle>> {
        let record = obj.0.borrow();
        if let ObjectClass::Host(host) = &record.class {
            let host = host.clone();
            drop(record);
            return Ok(host.borrow().prototype_of());
        }
        Ok(record.prototype.clone())
    }

    /// Own-level values that live in the class payload rather than the
    /// property table.
    fn class_special_get(&mut self, obj: &ObjectHandle, key: &str) -> Result<Option<Value>> {
        enum Special {
            Length(u32),
            StringLen(usize),
            StringChar(Option<String>),
            FunctionArgs,
            FunctionCaller,
            Host(Rc<RefCell<dyn crate::HostObject>>),
            None,
        }

        let special = {
            let record = obj.0.borrow();
            match &record.class {
                ObjectClass::Array { length } if key == "length" => Special::Length(*length),
                ObjectClass::StringWrapper(s) if key == "length" => {
                    Special::StringLen(utf16_length(s))
                }
                ObjectClass::StringWrapper(s) => match array_index_from_key(key) {
                    Some(index) => Special::StringChar(
                        utf16_unit_at(s, index as usize)
                            .map(|unit| String::from_utf16_lossy(&[unit])),
                    ),
                    None => Special::None,
                },
                ObjectClass::Function(_) if key == "arguments" => Special::FunctionArgs,
                ObjectClass::Function(_) if key == "caller" => Special::FunctionCaller,
                ObjectClass::Host(host) => Special::Host(host.clone()),
                _ => Special::None,
            }
        };

        match special {
            Special::Length(length) => Ok(Some(Value::from_f64(f64::from(length)))),
            Special::StringLen(length) => Ok(Some(Value::from_f64(length as f64))),
            Special::StringChar(Some(ch)) => Ok(Some(Value::String(ch))),
            Special::StringChar(None) => Ok(None),
            Special::FunctionArgs => {
                // Live while the function executes (innermost activation),
                // null otherwise.
                for frame in self.state.frames.iter().rev() {
                    if let Some(function) = &frame.function {
                        if function.same(obj) {
                            return Ok(Some(match &frame.arguments_object {
                                Some(args) => Value::Object(args.clone()),
                                None => Value::Null,
                            }));
                        }
                    }
                }
                Ok(Some(Value::Null))
            }
            Special::FunctionCaller => Ok(Some(Value::Null)),
            Special::Host(host) => {
                let got = host.borrow().get(key);
                match got {
                    Ok(HostGet::Value(value)) => Ok(Some(value)),
                    Ok(HostGet::Unknown) => Ok(Some(self.make_opaque_value())),
                    Ok(HostGet::Missing) => Ok(None),
                    Err(err) => Err(self.host_error(err)),
                }
            }
            Special::None => Ok(None),
        }
    }

    pub(crate) fn make_opaque_value(&mut self) -> Value {
        Value::Object(ObjectHandle::new(ObjectRecord::new(
            ObjectClass::HostOpaque,
            None,
        )))
    }

    pub(crate) fn object_has_own(&mut self, obj: &ObjectHandle, key: &str) -> Result<bool> {
        {
            let record = obj.0.borrow();
            match &record.class {
                ObjectClass::Array { .. } if key == "length" => return Ok(true),
                ObjectClass::StringWrapper(s) => {
                    if key == "length" {
                        return Ok(true);
                    }
                    if let Some(index) = array_index_from_key(key) {
                        return Ok((index as usize) < utf16_length(s));
                    }
                }
                ObjectClass::Host(host) => {
                    let host = host.clone();
                    drop(record);
                    let got = host.borrow().get(key);
                    return match got {
                        Ok(HostGet::Missing) => Ok(false),
                        Ok(_) => Ok(true),
                        Err(err) => Err(self.host_error(err)),
                    };
                }
                _ => {}
            }
        }
        Ok(obj.0.borrow().has_own(key))
    }

    pub(crate) fn has_property(&mut self, obj: &ObjectHandle, key: &str) -> Result<bool> {
        let mut current = obj.clone();
        for _ in 0..PROTO_WALK_LIMIT {
            if self.object_has_own(&current, key)? {
                return Ok(true);
            }
            match self.prototype_of(&current)? {
                Some(proto) => current = proto,
                None => return Ok(false),
            }
        }
        Ok(false)
    }

    /// Assignment. Walks for inherited accessors and read-only data slots,
    /// otherwise creates or updates an own data property on the receiver.
    /// Loose mode never throws here; refused writes vanish.
    pub(crate) fn object_set(&mut self, obj: &ObjectHandle, key: &str, value: Value) -> Result<()> {
        // Class-level targets first.
        {
            let record = obj.0.borrow();
            match &record.class {
                ObjectClass::Array { .. } if key == "length" => {
                    drop(record);
                    let length = self.to_number(&value)?;
                    return self.array_set_length(obj, length);
                }
                ObjectClass::StringWrapper(_) if key == "length" => return Ok(()),
                ObjectClass::StringWrapper(_) if array_index_from_key(key).is_some() => {
                    return Ok(());
                }
                ObjectClass::Function(_) if key == "arguments" || key == "caller" => {
                    return Ok(());
                }
                ObjectClass::Host(host) => {
                    let host = host.clone();
                    drop(record);
                    let result = host.borrow_mut().set(key, value);
                    return result.map_err(|err| self.host_error(err));
                }
                _ => {}
            }
        }

        let own = obj.0.borrow().get_own(key).cloned();
        match own {
            Some(Property::Data { writable, .. }) => {
                if writable {
                    if let Some(Property::Data { value: stored, .. }) =
                        obj.0.borrow_mut().get_own_mut(key)
                    {
                        *stored = value;
                    }
                }
                return Ok(());
            }
            Some(Property::Accessor { set, .. }) => {
                if let Some(setter) = set {
                    let receiver = Value::Object(obj.clone());
                    self.call_value(&setter, &receiver, &[value])?;
                }
                return Ok(());
            }
            Some(Property::ParamAlias { scope, name }) => {
                if let Some(slot) = scope.borrow_mut().bindings.get_mut(&name) {
                    slot.value = value;
                }
                return Ok(());
            }
            None => {}
        }

        // Inherited accessor or read-only data blocks the create.
        let mut cursor = self.prototype_of(obj)?;
        let mut hops = 0;
        while let Some(current) = cursor {
            let prop = current.0.borrow().get_own(key).cloned();
            match prop {
                Some(Property::Accessor { set, .. }) => {
                    if let Some(setter) = set {
                        let receiver = Value::Object(obj.clone());
                        self.call_value(&setter, &receiver, &[value])?;
                    }
                    return Ok(());
                }
                Some(Property::Data { writable: false, .. }) => return Ok(()),
                Some(_) => break,
                None => {}
            }
            cursor = self.prototype_of(&current)?;
            hops += 1;
            if hops >= PROTO_WALK_LIMIT {
                break;
            }
        }

        if !obj.0.borrow().extensible {
            return Ok(());
        }
        obj.0.borrow_mut().set_slot(key, Property::data(value));
        if let Some(index) = array_index_from_key(key) {
            self.array_note_index(obj, index);
        }
        Ok(())
    }

    pub(crate) fn object_delete(&mut self, obj: &ObjectHandle, key: &str) -> Result<bool> {
        {
            let record = obj.0.borrow();
            match &record.class {
                ObjectClass::Array { .. } if key == "length" => return Ok(false),
                ObjectClass::Host(host) => {
                    let host = host.clone();
                    drop(record);
                    let result = host.borrow_mut().delete(key);
                    return result.map_err(|err| self.host_error(err));
                }
                _ => {}
            }
        }
        let mut record = obj.0.borrow_mut();
        match record.get_own(key) {
            Some(prop) if prop.is_configurable() => {
                record.remove_slot(key);
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Ok(true),
        }
    }

    /// Own descriptor with any live alias resolved to its current value.
    pub(crate) fn own_property_resolved(
        &mut self,
        obj: &ObjectHandle,
        key: &str,
    ) -> Result<Option<Property>> {
        {
            let record = obj.0.borrow();
            match &record.class {
                ObjectClass::Array { length } if key == "length" => {
                    let length = *length;
                    return Ok(Some(Property::data_with(
                        Value::from_f64(f64::from(length)),
                        true,
                        false,
                        false,
                    )));
                }
                ObjectClass::StringWrapper(s) if key == "length" => {
                    let length = utf16_length(s);
                    return Ok(Some(Property::data_with(
                        Value::from_f64(length as f64),
                        false,
                        false,
                        false,
                    )));
                }
                ObjectClass::Function(_) if key == "arguments" || key == "caller" => {
                    return Ok(Some(Property::data_with(Value::Null, false, false, false)));
                }
                _ => {}
            }
        }
        let prop = obj.0.borrow().get_own(key).cloned();
        Ok(match prop {
            Some(Property::ParamAlias { scope, name }) => {
                let value = scope
                    .borrow()
                    .bindings
                    .get(&name)
                    .map(|slot| slot.value.clone())
                    .unwrap_or(Value::Undefined);
                Some(Property::data(value))
            }
            other => other,
        })
    }

    /// ES5 defineProperty semantics with the engine's error numbers.
    pub(crate) fn object_define(
        &mut self,
        obj: &ObjectHandle,
        key: &str,
        input: DescriptorInput,
    ) -> Result<()> {
        if input.is_accessor() {
            if input.is_data() {
                return Err(self.raise_type(
                    err_codes::INVALID_WRITABLE_PROP_DESC,
                    "property descriptor mixes accessor and data attributes",
                ));
            }
            for accessor in [&input.get, &input.set] {
                if let Some(value) = accessor {
                    if !value.is_undefined() && !value.is_callable() {
                        return Err(self.raise_type(
                            err_codes::FUNCTION_EXPECTED,
                            "accessor is not a function",
                        ));
                    }
                }
            }
        }

        {
            let record = obj.0.borrow();
            if let ObjectClass::Host(host) = &record.class {
                let host = host.clone();
                drop(record);
                let descriptor = crate::host::HostDescriptor {
                    value: input.value,
                    writable: input.writable,
                    enumerable: input.enumerable,
                    configurable: input.configurable,
                    get: input.get,
                    set: input.set,
                };
                let result = host.borrow_mut().define_own_property(key, descriptor);
                let accepted = result.map_err(|err| self.host_error(err))?;
                if !accepted {
                    return Err(self.raise_type(
                        err_codes::PROP_DESC_MISMATCH,
                        &format!("host object rejected the descriptor for '{key}'"),
                    ));
                }
                return Ok(());
            }
            let is_array = matches!(record.class, ObjectClass::Array { .. });
            drop(record);
            if is_array && key == "length" {
                if let Some(value) = &input.value {
                    let length = self.to_number(value)?;
                    return self.array_set_length(obj, length);
                }
                return Ok(());
            }
        }

        let existing = obj.0.borrow().get_own(key).cloned();
        let existing = match existing {
            Some(Property::ParamAlias { scope, name }) => {
                let value = scope
                    .borrow()
                    .bindings
                    .get(&name)
                    .map(|slot| slot.value.clone())
                    .unwrap_or(Value::Undefined);
                Some(Property::data(value))
            }
            other => other,
        };

        let next = match existing {
            None => {
                if !obj.0.borrow().extensible {
                    return Err(self.raise_type(
                        err_codes::NONCONFIGURABLE_REDEFINED,
                        "object is not extensible",
                    ));
                }
                if input.is_accessor() {
                    Property::Accessor {
                        get: normalize_accessor(input.get),
                        set: normalize_accessor(input.set),
                        enumerable: input.enumerable.unwrap_or(false),
                        configurable: input.configurable.unwrap_or(false),
                    }
                } else {
                    Property::Data {
                        value: input.value.unwrap_or(Value::Undefined),
                        writable: input.writable.unwrap_or(false),
                        enumerable: input.enumerable.unwrap_or(false),
                        configurable: input.configurable.unwrap_or(false),
                    }
                }
            }
            Some(Property::Data {
                value: old_value,
                writable,
                enumerable,
                configurable,
            }) => {
                if !configurable {
                    if input.configurable == Some(true)
                        || input.enumerable.is_some_and(|v| v != enumerable)
                    {
                        return Err(self.raise_type(
                            err_codes::NONCONFIGURABLE_REDEFINED,
                            &format!("cannot redefine non-configurable property '{key}'"),
                        ));
                    }
                    if input.is_accessor() {
                        return Err(self.raise_type(
                            err_codes::NONCONFIGURABLE_REDEFINED,
                            &format!("cannot redefine non-configurable property '{key}'"),
                        ));
                    }
                    if !writable {
                        if input.writable == Some(true) {
                            return Err(self.raise_type(
                                err_codes::NONWRITABLE_MODIFIED,
                                &format!("property '{key}' is not writable"),
                            ));
                        }
                        if let Some(value) = &input.value {
                            if !self.strict_equals(value, &old_value) {
                                return Err(self.raise_type(
                                    err_codes::NONWRITABLE_MODIFIED,
                                    &format!("property '{key}' is not writable"),
                                ));
                            }
                        }
                    }
                }
                if input.is_accessor() {
                    Property::Accessor {
                        get: normalize_accessor(input.get),
                        set: normalize_accessor(input.set),
                        enumerable: input.enumerable.unwrap_or(enumerable),
                        configurable: input.configurable.unwrap_or(configurable),
                    }
                } else {
                    Property::Data {
                        value: input.value.unwrap_or(old_value),
                        writable: input.writable.unwrap_or(writable),
                        enumerable: input.enumerable.unwrap_or(enumerable),
                        configurable: input.configurable.unwrap_or(configurable),
                    }
                }
            }
            Some(Property::Accessor {
                get,
                set,
                enumerable,
                configurable,
            }) => {
                if !configurable {
                    let same_get = matches!(&input.get, None)
                        || accessor_matches(&input.get, &get);
                    let same_set = matches!(&input.set, None)
                        || accessor_matches(&input.set, &set);
                    if input.configurable == Some(true)
                        || input.enumerable.is_some_and(|v| v != enumerable)
                        || input.is_data()
                        || !same_get
                        || !same_set
                    {
                        return Err(self.raise_type(
                            err_codes::NONCONFIGURABLE_REDEFINED,
                            &format!("cannot redefine non-configurable property '{key}'"),
                        ));
                    }
                }
                if input.is_data() {
                    Property::Data {
                        value: input.value.unwrap_or(Value::Undefined),
                        writable: input.writable.unwrap_or(false),
                        enumerable: input.enumerable.unwrap_or(enumerable),
                        configurable: input.configurable.unwrap_or(configurable),
                    }
                } else {
                    Property::Accessor {
                        get: match input.get {
                            Some(getter) => normalize_accessor(Some(getter)),
                            None => get,
                        },
                        set: match input.set {
                            Some(setter) => normalize_accessor(Some(setter)),
                            None => set,
                        },
                        enumerable: input.enumerable.unwrap_or(enumerable),
                        configurable: input.configurable.unwrap_or(configurable),
                    }
                }
            }
            Some(Property::ParamAlias { .. }) => unreachable!("alias resolved above"),
        };

        obj.0.borrow_mut().set_slot(key, next);
        if let Some(index) = array_index_from_key(key) {
            self.array_note_index(obj, index);
        }
        Ok(())
    }

    /// `length` keeps the array invariant: shrinking deletes indices at or
    /// past the new length.
    pub(crate) fn array_set_length(&mut self, obj: &ObjectHandle, length: f64) -> Result<()> {
        let new_length = crate::to_uint32(length);
        if f64::from(new_length) != length {
            return Err(self.raise_range(err_codes::INVALID_LENGTH, "invalid array length"));
        }
        let doomed: Vec<String> = {
            let record = obj.0.borrow();
            record
                .entries
                .iter()
                .filter_map(|slot| {
                    array_index_from_key(&slot.key)
                        .filter(|index| *index >= new_length)
                        .map(|_| slot.key.clone())
                })
                .collect()
        };
        let mut record = obj.0.borrow_mut();
        for key in doomed {
            record.remove_slot(&key);
        }
        if let ObjectClass::Array { length } = &mut record.class {
            *length = new_length;
        }
        Ok(())
    }

    fn array_note_index(&mut self, obj: &ObjectHandle, index: u32) {
        let mut record = obj.0.borrow_mut();
        if let ObjectClass::Array { length } = &mut record.class {
            if index >= *length {
                *length = index + 1;
            }
        }
    }

    /// `instanceof`: walk the left side's prototype chain looking for the
    /// right side's `prototype` object.
    pub(crate) fn instanceof_check(&mut self, value: &Value, ctor: &Value) -> Result<bool> {
        let Some(ctor_obj) = ctor.as_object() else {
            return Err(self.raise_type(
                err_codes::FUNCTION_EXPECTED,
                "right-hand side of 'instanceof' is not callable",
            ));
        };
        if !ctor_obj.0.borrow().is_callable() {
            return Err(self.raise_type(
                err_codes::FUNCTION_EXPECTED,
                "right-hand side of 'instanceof' is not callable",
            ));
        }

        // A bound function defers to its wrapped target.
        let target = match ctor_obj.0.borrow().function_kind() {
            Some(FunctionKind::Bound(bound)) => bound.target.clone(),
            _ => ctor_obj.clone(),
        };

        let prototype = self.object_get(&target, "prototype", ctor)?;
        let Some(prototype) = prototype.as_object().cloned() else {
            return Err(self.raise_type(
                err_codes::OBJECT_EXPECTED,
                "constructor has no object 'prototype'",
            ));
        };

        let Some(instance) = value.as_object() else {
            return Ok(false);
        };
        let mut cursor = self.prototype_of(instance)?;
        let mut hops = 0;
        while let Some(current) = cursor {
            if current.same(&prototype) {
                return Ok(true);
            }
            cursor = self.prototype_of(&current)?;
            hops += 1;
            if hops >= PROTO_WALK_LIMIT {
                break;
            }
        }
        Ok(false)
    }

    /// Candidate keys for `for...in`: own enumerable keys in insertion
    /// order, then each prototype's, first sighting wins. Liveness is
    /// re-checked while the loop runs.
    pub(crate) fn enumeration_candidates(&mut self, obj: &ObjectHandle) -> Result<Vec<String>> {
        let mut seen = std::collections::HashSet::new();
        let mut keys = Vec::new();
        let mut cursor = Some(obj.clone());
        let mut hops = 0;
        while let Some(current) = cursor {
            let own: Vec<String> = {
                let record = current.0.borrow();
                match &record.class {
                    ObjectClass::Host(host) => host.borrow().own_keys(),
                    _ => record.own_enumerable_keys(),
                }
            };
            for key in own {
                if seen.insert(key.clone()) {
                    keys.push(key);
                }
            }
            cursor = self.prototype_of(&current)?;
            hops += 1;
            if hops >= PROTO_WALK_LIMIT {
                break;
            }
        }
        Ok(keys)
    }

    /// Is `key` still observable (and enumerable) on the object or its
    /// chain? Deleted keys drop out of an in-flight enumeration.
    pub(crate) fn enumeration_still_live(
        &mut self,
        obj: &ObjectHandle,
        key: &str,
    ) -> Result<bool> {
        let mut cursor = Some(obj.clone());
        let mut hops = 0;
        while let Some(current) = cursor {
            let found = {
                let record = current.0.borrow();
                match &record.class {
                    ObjectClass::Host(host) => {
                        host.borrow().own_keys().iter().any(|k| k == key)
                    }
                    _ => record
                        .get_own(key)
                        .map(|prop| prop.is_enumerable())
                        .unwrap_or(false),
                }
            };
            if found {
                return Ok(true);
            }
            cursor = self.prototype_of(&current)?;
            hops += 1;
            if hops >= PROTO_WALK_LIMIT {
                break;
            }
        }
        Ok(false)
    }
}

fn normalize_accessor(value: Option<Value>) -> Option<Value> {
    match value {
        Some(Value::Undefined) | None => None,
        other => other,
    }
}

fn accessor_matches(input: &Option<Value>, existing: &Option<Value>) -> bool {
    match (input, existing) {
        (None, _) => true,
        (Some(Value::Undefined), None) => true,
        (Some(Value::Object(a)), Some(Value::Object(b))) => a.same(b),
        _ => false,
    }
}
