use super::*;

use std::cell::RefCell;
use std::rc::Rc;

use crate::host::HostObject;
use crate::runtime_state::{Frame, err_codes};

enum CallPlan {
    Script(Rc<ScriptFunction>),
    Native(NativeFunction),
    Bound(Rc<BoundFunction>),
    Host(Rc<RefCell<dyn HostObject>>),
}

impl Engine {
    pub(crate) fn call_value(
        &mut self,
        callee: &Value,
        this: &Value,
        args: &[Value],
    ) -> Result<Value> {
        let Some(func) = callee.as_object() else {
            return Err(self.raise_type(
                err_codes::FUNCTION_EXPECTED,
                "value is not a function",
            ));
        };
        let func = func.clone();
        self.call_function_object(&func, this, args)
    }

    pub(crate) fn call_function_object(
        &mut self,
        func: &ObjectHandle,
        this: &Value,
        args: &[Value],
    ) -> Result<Value> {
        let plan = {
            let record = func.0.borrow();
            match &record.class {
                ObjectClass::Function(FunctionKind::Script(script)) => {
                    CallPlan::Script(script.clone())
                }
                ObjectClass::Function(FunctionKind::Native(native)) => CallPlan::Native(*native),
                ObjectClass::Function(FunctionKind::Bound(bound)) => CallPlan::Bound(bound.clone()),
                ObjectClass::Host(host) if host.borrow().is_callable() => {
                    CallPlan::Host(host.clone())
                }
                _ => {
                    drop(record);
                    return Err(self.raise_type(
                        err_codes::FUNCTION_EXPECTED,
                        "value is not a function",
                    ));
                }
            }
        };

        match plan {
            CallPlan::Script(script) => self.call_script_function(func, &script, this, args, false),
            CallPlan::Native(native) => (native.func)(self, this, args),
            CallPlan::Bound(bound) => {
                let mut full_args = bound.bound_args.clone();
                full_args.extend_from_slice(args);
                let target = bound.target.clone();
                let bound_this = bound.bound_this.clone();
                self.call_function_object(&target, &bound_this, &full_args)
            }
            CallPlan::Host(host) => {
                let result = host.borrow().call(self, this, args);
                result.map_err(|err| self.host_error(err))
            }
        }
    }

    fn call_script_function(
        &mut self,
        func_obj: &ObjectHandle,
        script: &Rc<ScriptFunction>,
        this: &Value,
        args: &[Value],
        is_construct: bool,
    ) -> Result<Value> {
        if self.state.frames.len() >= self.state.config.max_call_depth {
            return Err(self.raise_range(err_codes::OUT_OF_STACK, "out of stack space"));
        }

        let this_value = if is_construct {
            this.clone()
        } else {
            self.coerce_call_this(this)?
        };

        let def = script.def.clone();
        let scope = ScopeRecord::declarative(Some(script.closure.clone()), true);

        // `arguments` first, parameters after: a parameter or hoisted var
        // of the same name shadows the default object.
        let arguments_object = self.make_arguments_object(func_obj, &def, &scope, args);
        scope.borrow_mut().bindings.insert(
            "arguments".to_string(),
            BindingSlot {
                value: Value::Object(arguments_object.clone()),
                mutable: true,
                deletable: false,
            },
        );
        {
            let mut scope_mut = scope.borrow_mut();
            for (index, name) in def.params.iter().enumerate() {
                let value = args.get(index).cloned().unwrap_or(Value::Undefined);
                scope_mut
                    .bindings
                    .insert(name.clone(), BindingSlot::variable(value));
            }
        }

        self.state.frames.push(Frame {
            this_value,
            scope: scope.clone(),
            arguments_object: Some(arguments_object.clone()),
            function: Some(func_obj.clone()),
        });

        let completion = stacker::maybe_grow(64 * 1024, 1024 * 1024, || {
            self.hoist_declarations(&def.body, &scope, false)
                .and_then(|()| self.execute_stmts(&def.body.body, &scope))
        });

        self.state.frames.pop();
        self.detach_arguments(&arguments_object);

        match completion? {
            ExecFlow::Return(value) => Ok(value),
            _ => Ok(Value::Undefined),
        }
    }

    /// Loose-mode `this` for plain calls: missing coerces to the global
    /// object, primitives to their wrapper.
    fn coerce_call_this(&mut self, this: &Value) -> Result<Value> {
        match this {
            Value::Undefined | Value::Null => Ok(Value::Object(self.state.global.clone())),
            Value::Object(_) => Ok(this.clone()),
            _ => Ok(Value::Object(self.to_object_value(this)?)),
        }
    }

    /// Indexed slots alias the named parameters while the call runs; a
    /// duplicated name live-binds only its last position, earlier
    /// positions keep the original argument value as plain data.
    fn make_arguments_object(
        &mut self,
        func_obj: &ObjectHandle,
        def: &Rc<FunctionDef>,
        scope: &ScopeHandle,
        args: &[Value],
    ) -> ObjectHandle {
        let arguments = ObjectHandle::new(ObjectRecord::new(
            ObjectClass::Arguments { detached: false },
            Some(self.state.intrinsics.object_prototype.clone()),
        ));
        {
            let mut record = arguments.0.borrow_mut();
            for (index, value) in args.iter().enumerate() {
                let key = index.to_string();
                let prop = match def.params.get(index) {
                    Some(name)
                        if def
                            .params
                            .iter()
                            .rposition(|param| param == name)
                            == Some(index) =>
                    {
                        Property::ParamAlias {
                            scope: scope.clone(),
                            name: name.clone(),
                        }
                    }
                    _ => Property::data(value.clone()),
                };
                record.set_slot(&key, prop);
            }
            record.set_slot(
                "length",
                Property::builtin(Value::from_f64(args.len() as f64)),
            );
            record.set_slot("callee", Property::builtin(Value::Object(func_obj.clone())));
        }
        arguments
    }

    /// The frame is gone; freeze every live alias at its current value.
    fn detach_arguments(&mut self, arguments: &ObjectHandle) {
        let mut record = arguments.0.borrow_mut();
        if let ObjectClass::Arguments { detached } = &mut record.class {
            *detached = true;
        }
        for slot in &mut record.entries {
            if let Property::ParamAlias { scope, name } = &slot.prop {
                let value = scope
                    .borrow()
                    .bindings
                    .get(name)
                    .map(|binding| binding.value.clone())
                    .unwrap_or(Value::Undefined);
                slot.prop = Property::data(value);
            }
        }
    }

    pub(crate) fn construct_value(&mut self, ctor: &Value, args: &[Value]) -> Result<Value> {
        let Some(func) = ctor.as_object() else {
            return Err(self.raise_type(
                err_codes::FUNCTION_EXPECTED,
                "value is not a constructor",
            ));
        };
        let func = func.clone();

        let plan = {
            let record = func.0.borrow();
            match &record.class {
                ObjectClass::Function(FunctionKind::Script(script)) => {
                    CallPlan::Script(script.clone())
                }
                ObjectClass::Function(FunctionKind::Native(native)) => CallPlan::Native(*native),
                ObjectClass::Function(FunctionKind::Bound(bound)) => CallPlan::Bound(bound.clone()),
                ObjectClass::Host(host) if host.borrow().is_constructor() => {
                    CallPlan::Host(host.clone())
                }
                _ => {
                    drop(record);
                    return Err(self.raise_type(
                        err_codes::FUNCTION_EXPECTED,
                        "value is not a constructor",
                    ));
                }
            }
        };

        match plan {
            CallPlan::Script(script) => {
                let prototype = self.object_get(&func, "prototype", ctor)?;
                let prototype = match prototype.as_object() {
                    Some(obj) => obj.clone(),
                    None => self.state.intrinsics.object_prototype.clone(),
                };
                let created = ObjectHandle::new(ObjectRecord::new(
                    ObjectClass::Plain,
                    Some(prototype),
                ));
                let this = Value::Object(created.clone());
                let result = self.call_script_function(&func, &script, &this, args, true)?;
                // The constructor's return value wins only when it is an
                // object; otherwise the freshly created instance does.
                Ok(match result {
                    Value::Object(_) => result,
                    _ => Value::Object(created),
                })
            }
            CallPlan::Native(native) => match native.construct {
                Some(construct) => construct(self, &Value::Undefined, args),
                None => Err(self.raise_type(
                    err_codes::FUNCTION_EXPECTED,
                    &format!("'{}' is not a constructor", native.name),
                )),
            },
            CallPlan::Bound(bound) => {
                let mut full_args = bound.bound_args.clone();
                full_args.extend_from_slice(args);
                let target = Value::Object(bound.target.clone());
                self.construct_value(&target, &full_args)
            }
            CallPlan::Host(host) => {
                let result = host.borrow().construct(self, args);
                result.map_err(|err| self.host_error(err))
            }
        }
    }

    /// The body of `eval`, run against an explicit scope: the caller's for
    /// a direct call, the global one for everything else.
    pub(crate) fn eval_in_scope(&mut self, args: &[Value], scope: &ScopeHandle) -> Result<Value> {
        let Some(first) = args.first() else {
            return Ok(Value::Undefined);
        };
        let Value::String(source) = first else {
            return Ok(first.clone());
        };
        let source = source.clone();
        let program =
            match crate::core_impl::parser::parse_program(&source, self.state.config.legacy_octal_literals)
            {
                Ok(program) => program,
                Err(Error::ScriptParse(message)) => {
                    // A parse failure inside eval is a catchable throw.
                    return Err(self.raise_syntax(&message));
                }
                Err(other) => return Err(other),
            };
        // Bindings introduced by eval code are deletable, unlike the
        // surrounding function's own declarations.
        self.run_program(&program, scope, true)
    }
}
