use crate::runtime_values::{ObjectHandle, ScopeHandle, Value};

/// What `delete` does when its operand is an unqualified identifier. Hosts
/// disagree on whether deleting a declared binding is an error; the engine
/// makes it a policy instead of hard-coding either answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Deleting an implicitly created global succeeds; deleting a declared
    /// binding quietly returns `false`.
    Lenient,
    /// Deleting a declared binding raises a TypeError.
    ThrowOnDeclared,
}

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub delete_policy: DeletePolicy,
    /// Accept `0`-prefixed octal literals; digits 8/9 demote the whole
    /// literal to decimal either way.
    pub legacy_octal_literals: bool,
    pub max_call_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            delete_policy: DeletePolicy::Lenient,
            legacy_octal_literals: true,
            max_call_depth: 512,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ErrorKind {
    Base,
    Type,
    Range,
    Reference,
    Syntax,
    Eval,
    Uri,
}

impl ErrorKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Base => "Error",
            Self::Type => "TypeError",
            Self::Range => "RangeError",
            Self::Reference => "ReferenceError",
            Self::Syntax => "SyntaxError",
            Self::Eval => "EvalError",
            Self::Uri => "URIError",
        }
    }

    pub(crate) fn all() -> [ErrorKind; 7] {
        [
            Self::Base,
            Self::Type,
            Self::Range,
            Self::Reference,
            Self::Syntax,
            Self::Eval,
            Self::Uri,
        ]
    }
}

/// HRESULT-style script error numbers, exposed through the `number`
/// property of thrown error objects.
pub(crate) mod err_codes {
    const fn code(n: u32) -> i32 {
        (0x800A_0000_u32 | n) as i32
    }

    pub const SUBSCRIPT_OUT_OF_RANGE: i32 = code(0x0009);
    pub const OUT_OF_STACK: i32 = code(0x001C);
    pub const PROP_DESC_MISMATCH: i32 = code(0x01BD);
    pub const SYNTAX: i32 = code(0x03EA);
    pub const NUMBER_EXPECTED: i32 = code(0x1389);
    pub const FUNCTION_EXPECTED: i32 = code(0x138A);
    pub const STRING_EXPECTED: i32 = code(0x138D);
    pub const OBJECT_EXPECTED: i32 = code(0x138F);
    pub const ILLEGAL_ASSIGN: i32 = code(0x1390);
    pub const UNDEFINED_VARIABLE: i32 = code(0x1391);
    pub const BOOLEAN_EXPECTED: i32 = code(0x1392);
    pub const REGEXP_EXPECTED: i32 = code(0x1398);
    pub const FRACTION_DIGITS_OUT_OF_RANGE: i32 = code(0x13A2);
    pub const INVALID_LENGTH: i32 = code(0x13A5);
    pub const INVALID_WRITABLE_PROP_DESC: i32 = code(0x13AC);
    pub const NONCONFIGURABLE_REDEFINED: i32 = code(0x13D6);
    pub const NONWRITABLE_MODIFIED: i32 = code(0x13D7);
}

/// The intrinsic objects every realm owns. Everything here is also
/// reachable through the global object; these handles exist so the
/// evaluator never has to look its own intrinsics up by name.
#[derive(Debug)]
pub(crate) struct Intrinsics {
    pub object_prototype: ObjectHandle,
    pub function_prototype: ObjectHandle,
    pub array_prototype: ObjectHandle,
    pub string_prototype: ObjectHandle,
    pub number_prototype: ObjectHandle,
    pub boolean_prototype: ObjectHandle,
    pub regexp_prototype: ObjectHandle,
    pub error_prototype: ObjectHandle,
    pub type_error_prototype: ObjectHandle,
    pub range_error_prototype: ObjectHandle,
    pub reference_error_prototype: ObjectHandle,
    pub syntax_error_prototype: ObjectHandle,
    pub eval_error_prototype: ObjectHandle,
    pub uri_error_prototype: ObjectHandle,
    /// The one true `eval`; call sites compare against it to classify a
    /// call as direct or indirect.
    pub eval_function: ObjectHandle,
}

impl Intrinsics {
    pub(crate) fn error_prototype_for(&self, kind: ErrorKind) -> &ObjectHandle {
        match kind {
            ErrorKind::Base => &self.error_prototype,
            ErrorKind::Type => &self.type_error_prototype,
            ErrorKind::Range => &self.range_error_prototype,
            ErrorKind::Reference => &self.reference_error_prototype,
            ErrorKind::Syntax => &self.syntax_error_prototype,
            ErrorKind::Eval => &self.eval_error_prototype,
            ErrorKind::Uri => &self.uri_error_prototype,
        }
    }
}

/// One active function invocation.
#[derive(Debug)]
pub(crate) struct Frame {
    pub this_value: Value,
    pub scope: ScopeHandle,
    pub arguments_object: Option<ObjectHandle>,
    pub function: Option<ObjectHandle>,
}

#[derive(Debug)]
pub(crate) struct RuntimeState {
    pub config: EngineConfig,
    pub global: ObjectHandle,
    pub global_scope: ScopeHandle,
    pub intrinsics: Intrinsics,
    pub frames: Vec<Frame>,
    /// Value of the most recently executed expression statement; this is
    /// what a program or `eval` invocation evaluates to.
    pub completion_value: Value,
    pub random_state: u64,
}
