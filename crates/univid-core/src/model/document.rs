// Field access on loosely-typed NVR documents.

use serde_json::Value;

fn lookup<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |v, key| v.get(key))
}

pub(crate) fn str_field(doc: &Value, path: &[&str]) -> Option<String> {
    lookup(doc, path)?.as_str().map(str::to_owned)
}

pub(crate) fn bool_field(doc: &Value, path: &[&str]) -> Option<bool> {
    lookup(doc, path)?.as_bool()
}

pub(crate) fn i64_field(doc: &Value, path: &[&str]) -> Option<i64> {
    lookup(doc, path)?.as_i64()
}

/// Pull one entity document out of a single-entity response.
///
/// The NVR answers either with the bare document or wrapped as
/// `{ "data": [ ... ] }`; in the latter case the entry whose `_id` matches
/// is taken.
pub(crate) fn single_document(resp: Value, id: &str) -> Option<Value> {
    if resp.get("_id").is_some() {
        return Some(resp);
    }
    match resp {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items
                .into_iter()
                .find(|item| item.get("_id").and_then(Value::as_str) == Some(id)),
            _ => None,
        },
        _ => None,
    }
}
