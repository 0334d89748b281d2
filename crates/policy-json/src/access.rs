//! Document traversal and edits.

use crate::{JsonPath, JsonPathError, Result, Segment};
use serde_json::Value;

/// Resolves `path` against `doc`, returning the addressed value.
///
/// Returns `None` when any segment fails to resolve; absence is not
/// an error here.
pub fn get<'a>(doc: &'a Value, path: &JsonPath) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.segments() {
        current = match (current, segment) {
            (Value::Object(map), Segment::Key(key)) => map.get(key)?,
            (Value::Array(items), Segment::Index(index)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Writes `value` at `path`, replacing whatever was there.
///
/// Intermediate containers are never auto-created: every segment up
/// to the last must already resolve. The final segment may insert a
/// new key into an existing object; an out-of-bounds final index
/// fails.
pub fn set(doc: &mut Value, path: &JsonPath, value: Value) -> Result<()> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(not_found(path));
    };
    let parent = resolve_parent(doc, parents).ok_or_else(|| not_found(path))?;
    match (parent, last) {
        (Value::Object(map), Segment::Key(key)) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        (Value::Array(items), Segment::Index(index)) if *index < items.len() => {
            items[*index] = value;
            Ok(())
        }
        _ => Err(not_found(path)),
    }
}

/// Pushes `value` onto the array addressed by `path`.
///
/// The full path must resolve, and the addressed value must be an
/// array.
pub fn append(doc: &mut Value, path: &JsonPath, value: Value) -> Result<()> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(not_found(path));
    };
    let parent = resolve_parent(doc, parents).ok_or_else(|| not_found(path))?;
    let target = match (parent, last) {
        (Value::Object(map), Segment::Key(key)) => map.get_mut(key),
        (Value::Array(items), Segment::Index(index)) => items.get_mut(*index),
        _ => None,
    }
    .ok_or_else(|| not_found(path))?;
    match target {
        Value::Array(items) => {
            items.push(value);
            Ok(())
        }
        _ => Err(JsonPathError::NotAnArray {
            path: path.to_string(),
        }),
    }
}

fn resolve_parent<'a>(doc: &'a mut Value, parents: &[Segment]) -> Option<&'a mut Value> {
    let mut current = doc;
    for segment in parents {
        current = match (current, segment) {
            (Value::Object(map), Segment::Key(key)) => map.get_mut(key)?,
            (Value::Array(items), Segment::Index(index)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

fn not_found(path: &JsonPath) -> JsonPathError {
    JsonPathError::PathNotFound {
        path: path.to_string(),
    }
}
