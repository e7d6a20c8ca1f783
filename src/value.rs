use std::{collections::BTreeMap, fmt, future::Future, pin::Pin, sync::Arc};

use crate::error::CallError;

/// Mapping used for objects and for every context layer.
pub type Object = BTreeMap<String, Value>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type CallResult = Result<Value, CallError>;

/// What a [`Function`] hands back when called.
pub enum Call {
    /// The result is already available.
    Ready(CallResult),
    /// The result is still in flight (e.g. a network request) and is awaited
    /// at the call site before the surrounding expression continues.
    Pending(BoxFuture<'static, CallResult>),
}

/// A callable value exposed to expressions.
///
/// # Examples
///
/// ```
/// use chat_expr::{Function, Value};
///
/// let double = Function::new(|args| match args.first() {
///     Some(Value::Integer(n)) => Ok(Value::Integer(n * 2)),
///     _ => Ok(Value::String("expected a number".into())),
/// });
/// ```
#[derive(Clone)]
pub struct Function(Arc<dyn Fn(Vec<Value>) -> Call + Send + Sync>);

impl Function {
    /// Wrap a synchronous callable.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> CallResult + Send + Sync + 'static,
    {
        Function(Arc::new(move |args| Call::Ready(f(args))))
    }

    /// Wrap a callable whose result is produced asynchronously.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallResult> + Send + 'static,
    {
        Function(Arc::new(move |args| Call::Pending(Box::pin(f(args)))))
    }

    pub fn call(&self, args: Vec<Value>) -> Call {
        (self.0)(args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function")
    }
}

/// A runtime value of the expression language.
///
/// There is no static typing: each operator checks the variants it receives
/// and rejects the rest with an `IllegalState` error.
///
/// # Examples
///
/// ```
/// use chat_expr::{Object, Value};
///
/// let number = Value::Integer(42);
/// let text = Value::String("hello".to_string());
/// let list = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
///
/// let mut obj = Object::new();
/// obj.insert("title".to_string(), Value::String("Just Chatting".to_string()));
/// let channel = Value::Object(obj);
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// Only produced by JSON interop; the language has no null literal
    Null,

    Boolean(bool),

    Integer(i64),

    Float(f64),

    String(String),

    Array(Vec<Value>),

    Object(Object),

    Function(Function),
}

impl PartialEq for Value {
    /// Numbers compare numerically across `Integer`/`Float`; functions compare
    /// by identity.
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Integer(a), Float(b)) | (Float(b), Integer(a)) => (*a as f64) == *b,
            (String(a), String(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            (Function(a), Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Value {
    /// Check if the value is truthy (for `not`, `and`, `or`)
    pub fn is_truthy(&self) -> bool {
        use Value::*;
        match self {
            Null => false,
            Boolean(b) => *b,
            Integer(n) => *n != 0,
            Float(n) => *n != 0.0 && !n.is_nan(),
            String(s) => !s.is_empty(),
            Array(_) | Object(_) | Function(_) => true,
        }
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as integer, only if no fraction would be lost
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Float(n) if n.fract() == 0.0 && n.is_finite() => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) | Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}
