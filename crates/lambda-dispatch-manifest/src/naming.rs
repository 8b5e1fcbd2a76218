//! Function naming
//!
//! A deployed function is named `<service>-<stage>-<Class>_<method>` and the
//! provider caps the full name at [`MAX_FUNCTION_NAME_LENGTH`] characters.
//! The resolver returns only the `<Class>_<method>` part; the prefix is added
//! by the deployment tooling.

use crate::error::NamingError;

pub const MAX_FUNCTION_NAME_LENGTH: usize = 64;

/// `<service>-<stage>-`
pub fn function_prefix(service: &str, stage: &str) -> String {
    format!("{service}-{stage}-")
}

/// Resolve the deployment-unique name of a handler method
///
/// With `trim`, a name that would overflow is shortened by truncating the
/// class and method parts to an even split of the room left after the
/// prefix and separator (the method gets the odd character).
///
/// ```rust
/// use lambda_dispatch_manifest::resolve_function_name;
///
/// assert_eq!(
///     resolve_function_name("service", "test", "ClassName", "methodName", false).unwrap(),
///     "ClassName_methodName"
/// );
/// ```
pub fn resolve_function_name(
    service: &str,
    stage: &str,
    class: &str,
    method: &str,
    trim: bool,
) -> Result<String, NamingError> {
    let prefix = function_prefix(service, stage);
    let prefix_length = prefix.chars().count();
    if prefix_length > MAX_FUNCTION_NAME_LENGTH {
        return Err(NamingError::PrefixTooLong {
            prefix,
            length: prefix_length,
            max: MAX_FUNCTION_NAME_LENGTH,
        });
    }

    let name = format!("{class}_{method}");
    let length = prefix_length + name.chars().count();
    if length <= MAX_FUNCTION_NAME_LENGTH {
        return Ok(name);
    }

    if !trim {
        return Err(NamingError::FunctionNameTooLong {
            name: format!("{prefix}{name}"),
            length,
            max: MAX_FUNCTION_NAME_LENGTH,
        });
    }

    let remaining = (MAX_FUNCTION_NAME_LENGTH - prefix_length).saturating_sub(1);
    if remaining <= 2 {
        return Err(NamingError::NotEnoughRoomToTrim { prefix, remaining });
    }

    let class_share = remaining / 2;
    let method_share = remaining - class_share;
    Ok(format!(
        "{}_{}",
        truncate(class, class_share),
        truncate(method, method_share)
    ))
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((index, _)) => &s[..index],
        None => s,
    }
}
