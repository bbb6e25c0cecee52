//! Renders a `Value` to the textual form `print` appends to the output log.
//! Sets are rendered in sorted order so output is deterministic regardless
//! of construction order.

use crate::value::Value;

pub fn render(v: &Value) -> String {
    match v {
        Value::Int(i) => i.to_string(),
        Value::Str(s) => format!("\"{}\"", s),
        Value::Set(vals) => {
            let mut rendered: Vec<String> = vals.iter().map(render).collect();
            rendered.sort();
            format!("{{{}}}", rendered.join(","))
        }
        Value::Tuple(vals) => {
            let rendered: Vec<String> = vals.iter().map(render).collect();
            format!("({})", rendered.join(","))
        }
        Value::Lambda { .. } => "<lambda>".to_string(),
        Value::Fsm(_) => "<fsm>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_int_and_string() {
        assert_eq!(render(&Value::Int(42)), "42");
        assert_eq!(render(&Value::Str("a".into())), "\"a\"");
    }

    #[test]
    fn renders_set_sorted() {
        let s = Value::Set(vec![Value::Int(2), Value::Int(1)]);
        assert_eq!(render(&s), "{1,2}");
    }

    #[test]
    fn renders_tuple_in_order() {
        let t = Value::Tuple(vec![Value::Int(1), Value::Str("s1".into())]);
        assert_eq!(render(&t), "(1,\"s1\")");
    }
}
