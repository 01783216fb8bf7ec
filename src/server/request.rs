use crate::value::{Object, Value};
use tracing::debug;

/// Split `a[b][]` into the root key and its bracketed segments.
///
/// Keys with unbalanced brackets are kept whole.
fn split_key(key: &str) -> (String, Vec<String>) {
    let Some(open) = key.find('[') else {
        return (key.to_string(), Vec::new());
    };
    if open == 0 {
        return (key.to_string(), Vec::new());
    }
    let root = key[..open].to_string();
    let mut segments = Vec::new();
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            return (key.to_string(), Vec::new());
        };
        segments.push(inner[..close].to_string());
        rest = &inner[close + 1..];
    }
    if !rest.is_empty() {
        return (key.to_string(), Vec::new());
    }
    (root, segments)
}

fn nest(segments: &[String], value: Value) -> Value {
    match segments.split_first() {
        None => value,
        Some((seg, tail)) if seg.is_empty() => Value::Array(vec![nest(tail, value)]),
        Some((seg, tail)) => {
            let mut map = Object::new();
            map.insert(seg.clone(), nest(tail, value));
            Value::Object(map)
        }
    }
}

/// Repeated leaf keys collect into an array
fn merge_leaf(slot: &mut Value, value: Value) {
    match slot {
        Value::Array(items) => items.push(value),
        existing => {
            let first = std::mem::take(existing);
            *existing = Value::Array(vec![first, value]);
        }
    }
}

fn insert(target: &mut Object, key: String, segments: &[String], value: Value) {
    let Some((next, tail)) = segments.split_first() else {
        match target.get_mut(&key) {
            Some(slot) => merge_leaf(slot, value),
            None => {
                target.insert(key, value);
            }
        }
        return;
    };

    let slot = target.entry(key).or_insert_with(|| {
        if next.is_empty() {
            Value::Array(Vec::new())
        } else {
            Value::Object(Object::new())
        }
    });

    if next.is_empty() {
        match slot {
            Value::Array(items) => items.push(nest(tail, value)),
            Value::Object(map) => {
                let idx = map.len().to_string();
                map.insert(idx, nest(tail, value));
            }
            leaf => merge_leaf(leaf, nest(tail, value)),
        }
        return;
    }

    if let Value::Array(items) = slot {
        let map: Object = std::mem::take(items)
            .into_iter()
            .enumerate()
            .map(|(idx, item)| (idx.to_string(), item))
            .collect();
        *slot = Value::Object(map);
    }
    match slot {
        Value::Object(map) => insert(map, next.clone(), tail, value),
        _ => debug!(key = %next, "Query key conflicts with a scalar value, ignored"),
    }
}

/// Objects keyed by `0..n` become arrays
fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let contiguous = !map.is_empty()
                && (0..map.len()).all(|idx| map.contains_key(&idx.to_string()));
            if contiguous {
                let mut map = map;
                let items = (0..map.len())
                    .filter_map(|idx| map.remove(&idx.to_string()))
                    .map(normalize)
                    .collect();
                Value::Array(items)
            } else {
                Value::Object(map.into_iter().map(|(k, v)| (k, normalize(v))).collect())
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        other => other,
    }
}

/// Parse a URL-encoded query string (or form body) into nested values.
///
/// Accepts either the bare query or a full path with `?`. Bracketed keys nest:
/// `a[b]=1` gives `{a: {b: "1"}}`, `a[]=1&a[]=2` and `a[0]=1&a[1]=2` give arrays, a key
/// without value gives `""` and repeated keys collect into an array. All leaves stay strings;
/// converters decide what they mean.
#[must_use]
pub fn parse_query_string(query: &str) -> Object {
    let query = match query.find('?') {
        Some(pos) => &query[pos + 1..],
        None => query,
    };
    let mut root = Object::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let (key, segments) = split_key(&key);
        insert(&mut root, key, &segments, Value::String(value.into_owned()));
    }
    root.into_iter().map(|(k, v)| (k, normalize(v))).collect()
}
