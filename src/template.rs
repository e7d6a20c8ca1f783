//! Splitting chat response templates into literal text and `${...}` spans.

/// A piece of a response template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Source between `${` and `}`
    Expression(String),
}

/// Split `template` into text and expression segments.
///
/// A span ends at the first `}` outside a double-quoted string. An unclosed
/// `${` is kept as literal text.
///
/// # Examples
///
/// ```
/// use chat_expr::template::{split, Segment};
///
/// let segments = split("Hi ${sender.name}!");
/// assert_eq!(segments, vec![
///     Segment::Text("Hi ".into()),
///     Segment::Expression("sender.name".into()),
///     Segment::Text("!".into()),
/// ]);
/// ```
pub fn split(template: &str) -> Vec<Segment> {
    let chars: Vec<char> = template.chars().collect();
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '$' && chars.get(i + 1) == Some(&'{') {
            if let Some(end) = find_close(&chars, i + 2) {
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Expression(chars[i + 2..end].iter().collect()));
                i = end + 1;
                continue;
            }
        }
        text.push(chars[i]);
        i += 1;
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    segments
}

fn find_close(chars: &[char], start: usize) -> Option<usize> {
    let mut in_string = false;
    for (i, &c) in chars.iter().enumerate().skip(start) {
        match c {
            '"' => in_string = !in_string,
            '}' if !in_string => return Some(i),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(source: &str) -> Segment {
        Segment::Expression(source.into())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(split("no spans"), vec![Segment::Text("no spans".into())]);
        assert!(split("").is_empty());
    }

    #[test]
    fn test_adjacent_spans() {
        assert_eq!(split("${a}${b}"), vec![expr("a"), expr("b")]);
    }

    #[test]
    fn test_brace_inside_string_does_not_close() {
        assert_eq!(
            split("${\"}\" in x} done"),
            vec![expr("\"}\" in x"), Segment::Text(" done".into())]
        );
    }

    #[test]
    fn test_unclosed_span_is_literal() {
        assert_eq!(
            split("cost: $5 ${oops"),
            vec![Segment::Text("cost: $5 ${oops".into())]
        );
    }
}
