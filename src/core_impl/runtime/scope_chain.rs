use super::*;

use crate::runtime_state::err_codes;

impl Engine {
    /// Walk the chain child→parent and read `name`. Object-backed scopes
    /// (with, global) answer for every property anywhere on their backing
    /// object's prototype chain.
    pub(crate) fn read_binding(
        &mut self,
        scope: &ScopeHandle,
        name: &str,
    ) -> Result<Option<Value>> {
        let mut cursor = Some(scope.clone());
        while let Some(current) = cursor {
            let (object, parent) = {
                let record = current.borrow();
                // Block-level bindings shadow the backing object even on
                // object-backed scopes (a `let` at the global level).
                if let Some(slot) = record.bindings.get(name) {
                    return Ok(Some(slot.value.clone()));
                }
                match &record.kind {
                    ScopeKind::Declarative => (None, record.parent.clone()),
                    ScopeKind::Object(object) => (Some(object.clone()), record.parent.clone()),
                }
            };
            if let Some(object) = object {
                if self.has_property(&object, name)? {
                    let receiver = Value::Object(object.clone());
                    return Ok(Some(self.object_get(&object, name, &receiver)?));
                }
            }
            cursor = parent;
        }
        Ok(None)
    }

    /// Assign to an existing binding, or fall off the chain and create an
    /// implicit global. Assignment to an immutable binding is a quiet no-op.
    pub(crate) fn write_binding(
        &mut self,
        scope: &ScopeHandle,
        name: &str,
        value: Value,
    ) -> Result<()> {
        let mut cursor = Some(scope.clone());
        while let Some(current) = cursor {
            let (object, parent) = {
                let mut record = current.borrow_mut();
                if let Some(slot) = record.bindings.get_mut(name) {
                    if slot.mutable {
                        slot.value = value;
                    }
                    return Ok(());
                }
                match &record.kind {
                    ScopeKind::Declarative => (None, record.parent.clone()),
                    ScopeKind::Object(obj) => (Some(obj.clone()), record.parent.clone()),
                }
            };
            if let Some(object) = object {
                if self.has_property(&object, name)? {
                    return self.object_set(&object, name, value);
                }
            }
            cursor = parent;
        }

        // Unresolved write: create a deletable property on the global
        // object, the way loose-mode scripts have always leaked globals.
        let global = self.state.global.clone();
        global
            .0
            .borrow_mut()
            .set_slot(name, Property::data(value));
        Ok(())
    }

    pub(crate) fn function_boundary(scope: &ScopeHandle) -> ScopeHandle {
        let mut current = scope.clone();
        loop {
            let next = {
                let record = current.borrow();
                if record.function_boundary {
                    return current.clone();
                }
                record.parent.clone()
            };
            match next {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// Hoist a `var` into the nearest function-boundary scope. Re-declaring
    /// an existing binding leaves its value untouched.
    pub(crate) fn declare_var(&mut self, scope: &ScopeHandle, name: &str, deletable: bool) {
        let boundary = Self::function_boundary(scope);
        let object = {
            let mut record = boundary.borrow_mut();
            match &record.kind {
                ScopeKind::Declarative => {
                    if !record.bindings.contains_key(name) {
                        record.bindings.insert(
                            name.to_string(),
                            BindingSlot {
                                value: Value::Undefined,
                                mutable: true,
                                deletable,
                            },
                        );
                    }
                    return;
                }
                ScopeKind::Object(object) => object.clone(),
            }
        };
        let mut record = object.0.borrow_mut();
        if !record.has_own(name) {
            record.set_slot(
                name,
                Property::data_with(Value::Undefined, true, true, deletable),
            );
        }
    }

    /// Bind a hoisted function declaration, overwriting any previous value.
    pub(crate) fn declare_function(
        &mut self,
        scope: &ScopeHandle,
        name: &str,
        value: Value,
        deletable: bool,
    ) -> Result<()> {
        let boundary = Self::function_boundary(scope);
        let object = {
            let mut record = boundary.borrow_mut();
            match &record.kind {
                ScopeKind::Declarative => {
                    record.bindings.insert(
                        name.to_string(),
                        BindingSlot {
                            value,
                            mutable: true,
                            deletable,
                        },
                    );
                    return Ok(());
                }
                ScopeKind::Object(object) => object.clone(),
            }
        };
        let writable = match object.0.borrow().get_own(name) {
            Some(prop) => prop.is_configurable() || matches!(prop, Property::Data { writable: true, .. }),
            None => true,
        };
        if writable {
            object
                .0
                .borrow_mut()
                .set_slot(name, Property::data_with(value, true, true, deletable));
        }
        Ok(())
    }

    /// A `let`/`const`/catch binding in the current (block) scope.
    pub(crate) fn declare_block_binding(
        &mut self,
        scope: &ScopeHandle,
        name: &str,
        value: Value,
        mutable: bool,
    ) {
        scope.borrow_mut().bindings.insert(
            name.to_string(),
            BindingSlot {
                value,
                mutable,
                deletable: false,
            },
        );
    }

    /// `delete identifier`. What this does to declared bindings is host
    /// policy, not language; see [`DeletePolicy`].
    pub(crate) fn delete_unqualified(&mut self, scope: &ScopeHandle, name: &str) -> Result<bool> {
        let mut cursor = Some(scope.clone());
        while let Some(current) = cursor {
            let step = {
                let record = current.borrow();
                if record.bindings.contains_key(name) {
                    None
                } else {
                    match &record.kind {
                        ScopeKind::Declarative => Some((None, record.parent.clone())),
                        ScopeKind::Object(object) => {
                            Some((Some(object.clone()), record.parent.clone()))
                        }
                    }
                }
            };
            let Some((object, parent)) = step else {
                // Declarative binding found.
                let deletable = current
                    .borrow()
                    .bindings
                    .get(name)
                    .map(|slot| slot.deletable)
                    .unwrap_or(false);
                if deletable {
                    current.borrow_mut().bindings.remove(name);
                    return Ok(true);
                }
                return match self.state.config.delete_policy {
                    DeletePolicy::Lenient => Ok(false),
                    DeletePolicy::ThrowOnDeclared => Err(self.raise_type(
                        err_codes::ILLEGAL_ASSIGN,
                        &format!("cannot delete declared binding '{name}'"),
                    )),
                };
            };
            if let Some(object) = object {
                if self.object_has_own(&object, name)? {
                    let deleted = self.object_delete(&object, name)?;
                    if !deleted
                        && self.state.config.delete_policy == DeletePolicy::ThrowOnDeclared
                    {
                        return Err(self.raise_type(
                            err_codes::ILLEGAL_ASSIGN,
                            &format!("cannot delete declared binding '{name}'"),
                        ));
                    }
                    return Ok(deleted);
                }
            }
            cursor = parent;
        }
        Ok(true)
    }

    pub(crate) fn current_this(&self) -> Value {
        match self.state.frames.last() {
            Some(frame) => frame.this_value.clone(),
            None => Value::Object(self.state.global.clone()),
        }
    }
}
