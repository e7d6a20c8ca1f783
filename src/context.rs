//! Layered lookup environment for one evaluation.
//!
//! A [`Context`] is assembled from an ordered list of [`Layer`]s. Later layers
//! override earlier ones key by key; nested objects are merged recursively,
//! while arrays and scalars are replaced wholesale.

use std::{fmt, sync::Arc};

use tracing::debug;

use crate::value::{Object, Value};

/// Produces a context layer from the per-call invocation data.
///
/// Implemented for any `Fn(&Value) -> Object`, so feature modules can register
/// plain closures:
///
/// ```
/// use chat_expr::{Object, Value};
///
/// let resolver = |invocation: &Value| {
///     let mut layer = Object::new();
///     layer.insert("greeting".to_string(), Value::from("hello"));
///     layer
/// };
/// # let _ = resolver;
/// ```
pub trait ContextLayer: Send + Sync {
    fn resolve(&self, invocation: &Value) -> Object;
}

impl<F> ContextLayer for F
where
    F: Fn(&Value) -> Object + Send + Sync,
{
    fn resolve(&self, invocation: &Value) -> Object {
        self(invocation)
    }
}

/// One contributor to the merged environment.
#[derive(Clone)]
pub enum Layer {
    /// A fixed mapping, e.g. the built-in functions
    Static(Object),
    /// The invocation value itself (message, channel, sender data)
    Invocation,
    /// A registered extension computed from the invocation
    Resolver(Arc<dyn ContextLayer>),
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Static(obj) => f.debug_tuple("Static").field(&obj.len()).finish(),
            Layer::Invocation => write!(f, "Invocation"),
            Layer::Resolver(_) => write!(f, "Resolver"),
        }
    }
}

/// Merge `layer` into `target`: objects recurse, everything else overwrites.
pub fn merge_objects(target: &mut Object, layer: Object) {
    for (key, incoming) in layer {
        let Value::Object(nested) = incoming else {
            target.insert(key, incoming);
            continue;
        };
        if let Some(Value::Object(existing)) = target.get_mut(&key) {
            merge_objects(existing, nested);
            continue;
        }
        target.insert(key, Value::Object(nested));
    }
}

/// Read-only environment used while interpreting one expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    entries: Object,
}

impl Context {
    pub fn new(entries: Object) -> Self {
        Context { entries }
    }

    /// Merge `layers` left to right against the given invocation value.
    pub fn assemble(layers: &[Layer], invocation: &Value) -> Self {
        let mut entries = Object::new();

        for layer in layers {
            match layer {
                Layer::Static(obj) => merge_objects(&mut entries, obj.clone()),
                Layer::Invocation => match invocation {
                    Value::Object(obj) => merge_objects(&mut entries, obj.clone()),
                    other => debug!(
                        kind = other.type_name(),
                        "invocation is not an object, skipping its layer"
                    ),
                },
                Layer::Resolver(resolver) => {
                    merge_objects(&mut entries, resolver.resolve(invocation))
                }
            }
        }

        Context { entries }
    }

    /// Look up a top-level key; `None` means not found.
    pub fn get_or_default(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> &Object {
        &self.entries
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }
}
