//! # Structural Flattener
//!
//! Bidirectional conversion between nested maps and flat, dotted-path maps,
//! plus recursive truthy-filtering of nested data.
//!
//! Flat keys encode nesting as delimiter-joined paths (`a.b.0.c`). On the
//! nested side, digit-only path segments are treated as integer positions:
//! a level whose keys are exactly `0..n-1` materializes as an array,
//! anything else stays a map with digit-string keys. That ambiguity is
//! inherent to the representation — `reverse_flatten(flatten(x))` is exact
//! except that it cannot tell an intentional `{"0": …, "1": …}` map from a
//! sequence.

use serde_json::{Map, Value};

/// Default delimiter joining path segments in flat keys.
pub const GLUE: char = '.';

/// The host's truthiness test, shared by [`filter_recursive`] and the
/// `Required` validation rule.
///
/// Falsy values: `null`, `false`, `0` (and `0.0`), `""`, `"0"`, empty
/// arrays and empty maps. The numeric-zero and `"0"` cases matter for
/// numeric form fields and are deliberate.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Flatten a nested map into dotted-path keys, one entry per scalar leaf.
///
/// Sequence indices become path segments. Empty containers produce no
/// entries.
pub fn flatten(nested: &Map<String, Value>) -> Map<String, Value> {
    flatten_with(nested, GLUE)
}

/// [`flatten`] with an explicit delimiter.
pub fn flatten_with(nested: &Map<String, Value>, glue: char) -> Map<String, Value> {
    let mut flat = Map::new();
    for (key, value) in nested {
        flatten_value(key.clone(), value, glue, &mut flat);
    }
    flat
}

fn flatten_value(path: String, value: &Value, glue: char, out: &mut Map<String, Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_value(format!("{}{}{}", path, glue, key), child, glue, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_value(format!("{}{}{}", path, glue, index), child, glue, out);
            }
        }
        scalar => {
            out.insert(path, scalar.clone());
        }
    }
}

/// Rebuild a nested structure from a flat, dotted-path map.
///
/// Keys without the delimiter are assigned directly at the top level.
/// An intermediate segment that already holds a scalar is clobbered with a
/// map, matching the original walk.
pub fn reverse_flatten(flat: &Map<String, Value>) -> Value {
    reverse_flatten_with(flat, GLUE)
}

/// [`reverse_flatten`] with an explicit delimiter.
pub fn reverse_flatten_with(flat: &Map<String, Value>, glue: char) -> Value {
    let mut root = Map::new();
    for (key, value) in flat {
        if key.contains(glue) {
            let segments: Vec<&str> = key.split(glue).collect();
            let mut current = &mut root;
            for segment in &segments[..segments.len() - 1] {
                current = ensure_object(current, segment);
            }
            current.insert(segments[segments.len() - 1].to_string(), value.clone());
        } else {
            root.insert(key.clone(), value.clone());
        }
    }
    materialize_sequences(Value::Object(root))
}

fn ensure_object<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let entry = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    match entry {
        Value::Object(inner) => inner,
        _ => unreachable!("entry was just replaced with an object"),
    }
}

fn materialize_sequences(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let map: Map<String, Value> = map
                .into_iter()
                .map(|(key, child)| (key, materialize_sequences(child)))
                .collect();
            match sequential_indices(&map) {
                Some(order) => {
                    let mut items: Vec<(usize, Value)> =
                        order.into_iter().zip(map.into_iter().map(|(_, v)| v)).collect();
                    items.sort_by_key(|(index, _)| *index);
                    Value::Array(items.into_iter().map(|(_, v)| v).collect())
                }
                None => Value::Object(map),
            }
        }
        Value::Array(items) => {
            Value::Array(items.into_iter().map(materialize_sequences).collect())
        }
        scalar => scalar,
    }
}

/// Parsed positions when every key is a digit string and the set covers
/// exactly `0..n-1`; `None` otherwise.
fn sequential_indices(map: &Map<String, Value>) -> Option<Vec<usize>> {
    if map.is_empty() {
        return None;
    }
    let mut indices = Vec::with_capacity(map.len());
    for key in map.keys() {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        indices.push(key.parse::<usize>().ok()?);
    }
    let mut sorted = indices.clone();
    sorted.sort_unstable();
    if sorted.iter().enumerate().all(|(expected, actual)| expected == *actual) {
        Some(indices)
    } else {
        None
    }
}

/// Recursively filter nested data, dropping entries the default truthiness
/// test rejects. Sub-structures are filtered before their parent level.
pub fn filter_recursive(value: &Value) -> Value {
    filter_recursive_with(value, &is_truthy)
}

/// [`filter_recursive`] with a custom predicate.
pub fn filter_recursive_with(value: &Value, predicate: &dyn Fn(&Value) -> bool) -> Value {
    match value {
        Value::Object(map) => {
            let mut filtered = Map::new();
            for (key, child) in map {
                let child = filter_child(child, predicate);
                if predicate(&child) {
                    filtered.insert(key.clone(), child);
                }
            }
            Value::Object(filtered)
        }
        Value::Array(items) => {
            let mut filtered = Vec::new();
            for child in items {
                let child = filter_child(child, predicate);
                if predicate(&child) {
                    filtered.push(child);
                }
            }
            Value::Array(filtered)
        }
        scalar => scalar.clone(),
    }
}

fn filter_child(child: &Value, predicate: &dyn Fn(&Value) -> bool) -> Value {
    if child.is_object() || child.is_array() {
        filter_recursive_with(child, predicate)
    } else {
        child.clone()
    }
}

/// Convenience wrapper for map-rooted data such as submission payloads.
pub fn filter_recursive_map(map: &Map<String, Value>) -> Map<String, Value> {
    match filter_recursive(&Value::Object(map.clone())) {
        Value::Object(filtered) => filtered,
        _ => Map::new(),
    }
}
