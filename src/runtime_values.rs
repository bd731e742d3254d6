use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use num_traits::ToPrimitive;

use crate::host::HostObject;
use crate::js_regex::Regex;
use crate::script_ast::FunctionDef;
use crate::{Engine, Result};

pub(crate) type NativeFn = fn(&mut Engine, &Value, &[Value]) -> Result<Value>;

/// Shared reference to an object record. Identity is pointer identity, which
/// is what `===` compares for objects.
#[derive(Clone)]
pub struct ObjectHandle(pub(crate) Rc<RefCell<ObjectRecord>>);

impl ObjectHandle {
    pub(crate) fn new(record: ObjectRecord) -> Self {
        Self(Rc::new(RefCell::new(record)))
    }

    pub(crate) fn same(&self, other: &ObjectHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(record) => write!(f, "[object {}]", record.class.class_name()),
            Err(_) => write!(f, "[object <borrowed>]"),
        }
    }
}

/// The engine-level numeric subtype report: integers that fit a 32-bit
/// signed slot carry `I4`, every other number carries `R8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantTag {
    Empty,
    Null,
    Bool,
    I4,
    R8,
    BStr,
    Dispatch,
    Unknown,
}

impl VariantTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "VT_EMPTY",
            Self::Null => "VT_NULL",
            Self::Bool => "VT_BOOL",
            Self::I4 => "VT_I4",
            Self::R8 => "VT_R8",
            Self::BStr => "VT_BSTR",
            Self::Dispatch => "VT_DISPATCH",
            Self::Unknown => "VT_UNKNOWN",
        }
    }
}

/// The closed runtime value sum. `Number`/`Float` are one language-level
/// number type; the split is a cache of the integer fast path and never
/// affects comparison results.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(i32),
    Float(f64),
    String(String),
    Object(ObjectHandle),
}

impl Value {
    /// Normalize an f64 arithmetic result, keeping the integer tag whenever
    /// the value is integral, in i32 range, and not negative zero.
    pub(crate) fn from_f64(value: f64) -> Self {
        if value == 0.0 && value.is_sign_negative() {
            return Self::Float(value);
        }
        if value.fract() == 0.0 {
            if let Some(int) = value.to_i32() {
                return Self::Number(int);
            }
        }
        Self::Float(value)
    }

    pub(crate) fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(v) => *v,
            Self::Number(v) => *v != 0,
            Self::Float(v) => *v != 0.0 && !v.is_nan(),
            Self::String(v) => !v.is_empty(),
            Self::Object(_) => true,
        }
    }

    pub fn variant_tag(&self) -> VariantTag {
        match self {
            Self::Undefined => VariantTag::Empty,
            Self::Null => VariantTag::Null,
            Self::Bool(_) => VariantTag::Bool,
            Self::Number(_) => VariantTag::I4,
            Self::Float(_) => VariantTag::R8,
            Self::String(_) => VariantTag::BStr,
            Self::Object(obj) => {
                if matches!(obj.0.borrow().class, ObjectClass::HostOpaque) {
                    VariantTag::Unknown
                } else {
                    VariantTag::Dispatch
                }
            }
        }
    }

    /// The `typeof` table, including the opaque host tag.
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "object",
            Self::Bool(_) => "boolean",
            Self::Number(_) | Self::Float(_) => "number",
            Self::String(_) => "string",
            Self::Object(obj) => {
                let record = obj.0.borrow();
                match &record.class {
                    ObjectClass::Function(_) => "function",
                    ObjectClass::HostOpaque => "unknown",
                    ObjectClass::Host(host) => {
                        if host.borrow().is_callable() {
                            "function"
                        } else {
                            "object"
                        }
                    }
                    _ => "object",
                }
            }
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(f64::from(*v)),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn as_object(&self) -> Option<&ObjectHandle> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub(crate) fn is_callable(&self) -> bool {
        match self {
            Self::Object(obj) => obj.0.borrow().is_callable(),
            _ => false,
        }
    }
}

/// A value raised by `throw` (or by a runtime fault), surfaced to the
/// embedder when nothing catches it.
#[derive(Debug, Clone)]
pub struct ThrownValue {
    pub(crate) value: Value,
    pub(crate) message: String,
}

impl ThrownValue {
    pub(crate) fn new(value: Value, message: String) -> Self {
        Self { value, message }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One property in the table: a data slot, an accessor pair, or a live
/// alias into a parameter slot (arguments objects only, until detach).
#[derive(Debug, Clone)]
pub(crate) enum Property {
    Data {
        value: Value,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    },
    Accessor {
        get: Option<Value>,
        set: Option<Value>,
        enumerable: bool,
        configurable: bool,
    },
    ParamAlias {
        scope: ScopeHandle,
        name: String,
    },
}

impl Property {
    pub(crate) fn data(value: Value) -> Self {
        Self::Data {
            value,
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    pub(crate) fn data_with(
        value: Value,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    ) -> Self {
        Self::Data {
            value,
            writable,
            enumerable,
            configurable,
        }
    }

    /// The attribute set shared by almost every built-in method slot.
    pub(crate) fn builtin(value: Value) -> Self {
        Self::Data {
            value,
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }

    pub(crate) fn frozen(value: Value) -> Self {
        Self::Data {
            value,
            writable: false,
            enumerable: false,
            configurable: false,
        }
    }

    pub(crate) fn is_enumerable(&self) -> bool {
        match self {
            Self::Data { enumerable, .. } | Self::Accessor { enumerable, .. } => *enumerable,
            Self::ParamAlias { .. } => true,
        }
    }

    pub(crate) fn is_configurable(&self) -> bool {
        match self {
            Self::Data { configurable, .. } | Self::Accessor { configurable, .. } => *configurable,
            Self::ParamAlias { .. } => true,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PropertySlot {
    pub key: String,
    pub prop: Property,
}

#[derive(Debug)]
pub(crate) struct ScriptFunction {
    pub def: Rc<FunctionDef>,
    pub closure: ScopeHandle,
}

#[derive(Clone, Copy)]
pub(crate) struct NativeFunction {
    pub name: &'static str,
    pub length: u32,
    pub func: NativeFn,
    /// `new` behavior, for the natives that are constructors.
    pub construct: Option<NativeFn>,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "native function {}", self.name)
    }
}

#[derive(Debug)]
pub(crate) struct BoundFunction {
    pub target: ObjectHandle,
    pub bound_this: Value,
    pub bound_args: Vec<Value>,
}

#[derive(Debug)]
pub(crate) enum FunctionKind {
    Script(Rc<ScriptFunction>),
    Native(NativeFunction),
    Bound(Rc<BoundFunction>),
}

#[derive(Debug)]
pub(crate) struct RegexpRecord {
    pub regex: Regex,
    pub source: String,
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
}

pub(crate) enum ObjectClass {
    Plain,
    Math,
    Array { length: u32 },
    Function(FunctionKind),
    Arguments { detached: bool },
    Error,
    Regexp(RegexpRecord),
    BooleanWrapper(bool),
    NumberWrapper(f64),
    StringWrapper(String),
    Host(Rc<RefCell<dyn HostObject>>),
    HostOpaque,
}

impl fmt::Debug for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

impl ObjectClass {
    pub(crate) fn class_name(&self) -> &'static str {
        match self {
            Self::Plain | Self::Arguments { .. } | Self::Host(_) | Self::HostOpaque => "Object",
            Self::Math => "Math",
            Self::Array { .. } => "Array",
            Self::Function(_) => "Function",
            Self::Error => "Error",
            Self::Regexp(_) => "RegExp",
            Self::BooleanWrapper(_) => "Boolean",
            Self::NumberWrapper(_) => "Number",
            Self::StringWrapper(_) => "String",
        }
    }
}

/// An object record: insertion-ordered property table, shared prototype
/// link, extensibility flag, and the class payload.
#[derive(Debug)]
pub(crate) struct ObjectRecord {
    pub entries: Vec<PropertySlot>,
    pub index_by_key: HashMap<String, usize>,
    pub prototype: Option<ObjectHandle>,
    pub extensible: bool,
    pub class: ObjectClass,
}

impl ObjectRecord {
    pub(crate) fn new(class: ObjectClass, prototype: Option<ObjectHandle>) -> Self {
        Self {
            entries: Vec::new(),
            index_by_key: HashMap::new(),
            prototype,
            extensible: true,
            class,
        }
    }

    pub(crate) fn get_own(&self, key: &str) -> Option<&Property> {
        self.index_by_key
            .get(key)
            .and_then(|index| self.entries.get(*index))
            .map(|slot| &slot.prop)
    }

    pub(crate) fn get_own_mut(&mut self, key: &str) -> Option<&mut Property> {
        let index = self.index_by_key.get(key).copied()?;
        self.entries.get_mut(index).map(|slot| &mut slot.prop)
    }

    pub(crate) fn has_own(&self, key: &str) -> bool {
        self.index_by_key.contains_key(key)
    }

    /// Insert or overwrite, preserving first-insertion order.
    pub(crate) fn set_slot(&mut self, key: &str, prop: Property) {
        if let Some(index) = self.index_by_key.get(key).copied() {
            self.entries[index].prop = prop;
            return;
        }
        let index = self.entries.len();
        self.entries.push(PropertySlot {
            key: key.to_string(),
            prop,
        });
        self.index_by_key.insert(key.to_string(), index);
    }

    pub(crate) fn remove_slot(&mut self, key: &str) -> bool {
        let Some(index) = self.index_by_key.remove(key) else {
            return false;
        };
        self.entries.remove(index);
        for slot in &self.entries[index..] {
            if let Some(stored) = self.index_by_key.get_mut(&slot.key) {
                *stored -= 1;
            }
        }
        true
    }

    pub(crate) fn own_keys(&self) -> Vec<String> {
        self.entries.iter().map(|slot| slot.key.clone()).collect()
    }

    pub(crate) fn own_enumerable_keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|slot| slot.prop.is_enumerable())
            .map(|slot| slot.key.clone())
            .collect()
    }

    pub(crate) fn is_callable(&self) -> bool {
        match &self.class {
            ObjectClass::Function(_) => true,
            ObjectClass::Host(host) => host.borrow().is_callable(),
            _ => false,
        }
    }

    pub(crate) fn function_kind(&self) -> Option<&FunctionKind> {
        match &self.class {
            ObjectClass::Function(kind) => Some(kind),
            _ => None,
        }
    }
}

pub(crate) type ScopeHandle = Rc<RefCell<ScopeRecord>>;

#[derive(Debug, Clone)]
pub(crate) struct BindingSlot {
    pub value: Value,
    pub mutable: bool,
    pub deletable: bool,
}

impl BindingSlot {
    pub(crate) fn variable(value: Value) -> Self {
        Self {
            value,
            mutable: true,
            deletable: false,
        }
    }
}

#[derive(Debug)]
pub(crate) enum ScopeKind {
    Declarative,
    Object(ObjectHandle),
}

/// One link of the environment chain. Parents are shared, never owned:
/// every closure created under a scope keeps it alive.
#[derive(Debug)]
pub(crate) struct ScopeRecord {
    pub kind: ScopeKind,
    pub bindings: HashMap<String, BindingSlot>,
    pub parent: Option<ScopeHandle>,
    /// True for the global scope and for every function-call scope; `var`
    /// hoisting and direct-eval declarations land on the nearest boundary.
    pub function_boundary: bool,
}

impl ScopeRecord {
    pub(crate) fn declarative(parent: Option<ScopeHandle>, function_boundary: bool) -> ScopeHandle {
        Rc::new(RefCell::new(Self {
            kind: ScopeKind::Declarative,
            bindings: HashMap::new(),
            parent,
            function_boundary,
        }))
    }

    pub(crate) fn object_backed(
        object: ObjectHandle,
        parent: Option<ScopeHandle>,
        function_boundary: bool,
    ) -> ScopeHandle {
        Rc::new(RefCell::new(Self {
            kind: ScopeKind::Object(object),
            bindings: HashMap::new(),
            parent,
            function_boundary,
        }))
    }
}
