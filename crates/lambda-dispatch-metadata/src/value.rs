//! Class identity and lookups over structured event values

use std::fmt;

use serde_json::Value;

/// Identity of a handler or service class
///
/// The identity is the class's short name. It keys the metadata registry,
/// names the class's binding in the container and forms the class half of
/// generated function names, so it must be unique within a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(&'static str);

impl ClassId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Identity derived from a Rust type: the last path segment, without generics
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(short_type_name(std::any::type_name::<T>()))
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = match full.find('<') {
        Some(pos) => &full[..pos],
        None => full,
    };
    match base.rfind("::") {
        Some(pos) => &base[pos + 2..],
        None => base,
    }
}

/// Resolve a dot-separated path by successive property descent
///
/// Returns `None` as soon as a segment is missing; numeric segments index into
/// arrays. Never fails on `null` or scalar intermediates.
pub fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Case-insensitive header lookup: the key as given, then its lowercase form
pub fn header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a Value> {
    let headers = headers.as_object()?;
    headers
        .get(name)
        .filter(|v| !v.is_null())
        .or_else(|| headers.get(&name.to_lowercase()).filter(|v| !v.is_null()))
}
