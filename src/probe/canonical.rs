//! Canonical JSON serialization for order-independent equality.
//!
//! Object keys are emitted in sorted (byte) order, arrays keep their order.
//! Two documents are structurally equal iff their canonical forms are
//! byte-identical.

use serde_json::{Number, Value};

/// Integral floats below this magnitude are written in integer form.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Deterministic serialization of `value`.
pub fn canonicalize(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

/// Structural equality ignoring object key order.
pub fn json_eq(a: &Value, b: &Value) -> bool {
    canonicalize(a) == canonicalize(b)
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(n, out),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();

            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_value(&map[key], out);
            }
            out.push('}');
        }
    }
}

fn write_number(n: &Number, out: &mut String) {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER {
                out.push_str(&(f as i64).to_string());
                return;
            }
        }
    }
    out.push_str(&n.to_string());
}

fn write_string(s: &str, out: &mut String) {
    // Display on a string value yields the escaped, quoted JSON literal.
    out.push_str(&Value::from(s).to_string());
}
