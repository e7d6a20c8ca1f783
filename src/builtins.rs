//! Built-in functions available to every expression.
//!
//! Built-ins never abort an evaluation for bad arguments or network trouble:
//! they hand back a descriptive string instead, so a chat response still has
//! something to show.

pub mod fetch;
pub mod time;

use std::{sync::Arc, time::Instant};

use rand::{Rng, seq::SliceRandom};

use crate::{
    engine::EngineConfig,
    output::render_text,
    value::{Function, Object, Value},
};

use self::fetch::Fetcher;

fn insert(library: &mut Object, name: &str, function: Function) {
    library.insert(name.to_string(), Value::Function(function));
}

fn long_flag(args: &[Value], index: usize) -> bool {
    args.get(index).is_some_and(Value::is_truthy)
}

/// Build the static layer of built-in functions.
///
/// `started` is the moment `uptime()` counts from.
pub fn standard_library(config: &EngineConfig, started: Instant) -> Object {
    let mut library = Object::new();

    insert(&mut library, "pick", Function::new(|args| Ok(pick(&args))));
    insert(
        &mut library,
        "randomInt",
        Function::new(|args| Ok(random_int(&args))),
    );

    let answers: Arc<[String]> = config.eight_ball_answers.clone().into();
    insert(
        &mut library,
        "eightBall",
        Function::new(move |_| Ok(eight_ball(&answers))),
    );

    insert(
        &mut library,
        "timeUntil",
        Function::new(|args| Ok(time::time_until(&args, chrono::Utc::now()))),
    );
    insert(
        &mut library,
        "timeSince",
        Function::new(|args| Ok(time::time_since(&args, chrono::Utc::now()))),
    );
    insert(
        &mut library,
        "uptime",
        Function::new(move |args| {
            let seconds = i64::try_from(started.elapsed().as_secs()).unwrap_or(i64::MAX);
            Ok(Value::String(time::format_duration(
                seconds,
                long_flag(&args, 0),
            )))
        }),
    );
    insert(
        &mut library,
        "urlEncode",
        Function::new(|args| {
            let text = args.first().map(render_text).unwrap_or_default();
            Ok(Value::String(url_encode(&text)))
        }),
    );

    let fetcher = Fetcher::new(config);
    insert(&mut library, "fetchText", {
        let fetcher = fetcher.clone();
        Function::from_async(move |args| {
            let fetcher = fetcher.clone();
            async move { Ok(fetcher.fetch_text(&args).await) }
        })
    });
    insert(&mut library, "fetchJson", {
        let fetcher = fetcher.clone();
        Function::from_async(move |args| {
            let fetcher = fetcher.clone();
            async move { Ok(fetcher.fetch_json(&args).await) }
        })
    });
    insert(
        &mut library,
        "fetchHtml",
        Function::from_async(move |args| {
            let fetcher = fetcher.clone();
            async move { Ok(fetcher.fetch_html(&args).await) }
        }),
    );

    library
}

/// `pick(array)`: a uniformly random element.
pub fn pick(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::Array(items)) => items
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| Value::from("Nothing to pick from")),
        _ => Value::from("pick expects an array"),
    }
}

/// `randomInt(min, max)`: inclusive on both ends, in either order.
pub fn random_int(args: &[Value]) -> Value {
    let (Some(a), Some(b)) = (
        args.first().and_then(Value::as_int),
        args.get(1).and_then(Value::as_int),
    ) else {
        return Value::from("randomInt expects two whole numbers");
    };
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    Value::Integer(rand::thread_rng().gen_range(low..=high))
}

pub fn eight_ball(answers: &[String]) -> Value {
    answers
        .choose(&mut rand::thread_rng())
        .map(|answer| Value::String(answer.clone()))
        .unwrap_or_else(|| Value::from("Ask again later."))
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn url_encode(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encode() {
        assert_eq!(url_encode("hello world"), "hello%20world");
        assert_eq!(url_encode("a&b=c/d"), "a%26b%3Dc%2Fd");
        assert_eq!(url_encode("ü"), "%C3%BC");
        assert_eq!(url_encode("keep-_.!~*'()"), "keep-_.!~*'()");
    }

    #[test]
    fn test_pick_from_array() {
        let items = vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)];
        let picked = pick(&[Value::Array(items.clone())]);
        assert!(items.contains(&picked));
        assert_eq!(
            pick(&[Value::Array(vec![])]),
            Value::from("Nothing to pick from")
        );
        assert_eq!(pick(&[Value::Integer(1)]), Value::from("pick expects an array"));
    }

    #[test]
    fn test_random_int_is_inclusive_and_order_insensitive() {
        for _ in 0..50 {
            let Value::Integer(n) = random_int(&[Value::Integer(5), Value::Integer(3)]) else {
                panic!("expected an integer");
            };
            assert!((3..=5).contains(&n));
        }
        assert_eq!(
            random_int(&[Value::Integer(4), Value::Integer(4)]),
            Value::Integer(4)
        );
        assert_eq!(
            random_int(&[Value::from("x")]),
            Value::from("randomInt expects two whole numbers")
        );
    }

    #[test]
    fn test_eight_ball_uses_configured_answers() {
        let answers = vec!["Yes.".to_string()];
        assert_eq!(eight_ball(&answers), Value::from("Yes."));
        assert_eq!(eight_ball(&[]), Value::from("Ask again later."));
    }
}
