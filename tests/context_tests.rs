// tests/context_tests.rs

use std::sync::Arc;

use chat_expr::context::merge_objects;
use chat_expr::{Context, Engine, Layer, Object, Value};

fn object(pairs: Vec<(&str, Value)>) -> Object {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[test]
fn test_nested_objects_merge() {
    let mut target = object(vec![(
        "user",
        Value::Object(object(vec![
            ("name", Value::from("ada")),
            ("level", Value::Integer(1)),
        ])),
    )]);
    let layer = object(vec![(
        "user",
        Value::Object(object(vec![
            ("level", Value::Integer(5)),
            ("vip", Value::Boolean(true)),
        ])),
    )]);

    merge_objects(&mut target, layer);

    assert_eq!(
        target.get("user"),
        Some(&Value::Object(object(vec![
            ("level", Value::Integer(5)),
            ("name", Value::from("ada")),
            ("vip", Value::Boolean(true)),
        ])))
    );
}

#[test]
fn test_arrays_and_scalars_are_replaced() {
    let mut target = object(vec![
        ("roles", Value::Array(vec![Value::from("mod"), Value::from("vip")])),
        ("user", Value::Object(object(vec![("name", Value::from("ada"))]))),
    ]);
    let layer = object(vec![
        ("roles", Value::Array(vec![Value::from("owner")])),
        ("user", Value::from("not an object anymore")),
    ]);

    merge_objects(&mut target, layer);

    assert_eq!(
        target.get("roles"),
        Some(&Value::Array(vec![Value::from("owner")]))
    );
    assert_eq!(target.get("user"), Some(&Value::from("not an object anymore")));
}

#[test]
fn test_later_layers_win() {
    let defaults = object(vec![
        ("greeting", Value::from("hello")),
        ("prefix", Value::from("!")),
    ]);
    let invocation = Value::Object(object(vec![("greeting", Value::from("hi"))]));
    let resolver = |invocation: &Value| {
        let sender = match invocation {
            Value::Object(obj) => obj.get("greeting").cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        };
        object(vec![("echo", sender), ("prefix", Value::from("?"))])
    };

    let layers = vec![
        Layer::Static(defaults),
        Layer::Invocation,
        Layer::Resolver(Arc::new(resolver)),
    ];
    let context = Context::assemble(&layers, &invocation);

    assert_eq!(context.get_or_default("greeting"), Some(&Value::from("hi")));
    assert_eq!(context.get_or_default("prefix"), Some(&Value::from("?")));
    assert_eq!(context.get_or_default("echo"), Some(&Value::from("hi")));
    assert_eq!(context.get_or_default("absent"), None);
}

#[test]
fn test_non_object_invocation_is_skipped() {
    let layers = vec![
        Layer::Static(object(vec![("a", Value::Integer(1))])),
        Layer::Invocation,
    ];
    let context = Context::assemble(&layers, &Value::from("just text"));
    assert_eq!(context.entries().len(), 1);
}

#[tokio::test]
async fn test_registered_layer_overrides_invocation() {
    let mut engine = Engine::default();
    engine.register_context_layer(|_: &Value| {
        object(vec![(
            "user",
            Value::Object(object(vec![("title", Value::from("Captain"))])),
        )])
    });

    let invocation = Value::Object(object(vec![(
        "user",
        Value::Object(object(vec![
            ("name", Value::from("ada")),
            ("title", Value::from("Crew")),
        ])),
    )]));

    assert_eq!(
        engine
            .evaluate("user.title + \" \" + user.name", &invocation)
            .await,
        Value::from("Captain ada")
    );
}

#[test]
fn test_builtins_are_in_every_context() {
    let engine = Engine::default();
    let context = engine.context_for(&Value::Null);
    for name in [
        "pick",
        "randomInt",
        "eightBall",
        "fetchText",
        "fetchJson",
        "fetchHtml",
        "timeUntil",
        "timeSince",
        "uptime",
        "urlEncode",
    ] {
        assert!(
            matches!(context.get_or_default(name), Some(Value::Function(_))),
            "missing built-in {}",
            name
        );
    }
}
