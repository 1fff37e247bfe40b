//! Naming utilities
//!
//! Pure string transforms used to derive type names, file tags, call
//! template variables and enum tokens from document identifiers.

use once_cell::sync::Lazy;
use regex::Regex;

static CAMEL_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-_.]([a-z])").expect("valid camel case pattern"));

static PATH_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\s?([^{}\s]*)\s?\}").expect("valid path token pattern"));

static UNSAFE_ENUM_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid enum character pattern"));

static REPEATED_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_+").expect("valid underscore pattern"));

static REPEATED_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("valid dash pattern"));

/// Token used for the empty string literal in enums
pub const EMPTY_ENUM_TOKEN: &str = "EMPTY_VALUE";

/// Capitalize the lowercase letter following `-`, `_` or `.` and drop the separator
///
/// # Examples
/// ```
/// use restgen_common::naming::camel_case;
///
/// assert_eq!(camel_case("user_id"), "userId");
/// assert_eq!(camel_case("country-code"), "countryCode");
/// ```
pub fn camel_case(name: &str) -> String {
    CAMEL_SEPARATOR
        .replace_all(name, |caps: &regex::Captures| caps[1].to_uppercase())
        .into_owned()
}

/// camelCase with the first character upper-cased
///
/// # Examples
/// ```
/// use restgen_common::naming::pascal_case;
///
/// assert_eq!(pascal_case("phone_number"), "PhoneNumber");
/// ```
pub fn pascal_case(name: &str) -> String {
    let camel = camel_case(name);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Underscores become dashes, dash runs collapse to one, result is lower-cased
pub fn dash_case(name: &str) -> String {
    let dashed = name.replace('_', "-");
    REPEATED_DASH
        .replace_all(&dashed, "-")
        .to_lowercase()
}

/// All `{token}` names of a path template, left to right, without braces
///
/// # Examples
/// ```
/// use restgen_common::naming::extract_path_tokens;
///
/// assert_eq!(
///     extract_path_tokens("/users/{userId}/phones/{id}"),
///     vec!["userId".to_string(), "id".to_string()]
/// );
/// ```
pub fn extract_path_tokens(path: &str) -> Vec<String> {
    PATH_TOKEN
        .captures_iter(path)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Make a literal usable as an enum member name
///
/// Characters outside `[A-Za-z0-9_]` become `_` and runs of `_` collapse.
/// Applying it to its own output returns the output unchanged.
pub fn safe_enum_name(literal: &str) -> String {
    if literal.is_empty() {
        return EMPTY_ENUM_TOKEN.to_string();
    }
    let replaced = UNSAFE_ENUM_CHAR.replace_all(literal, "_");
    REPEATED_UNDERSCORE
        .replace_all(&replaced, "_")
        .into_owned()
}

/// Quote a property name that would otherwise start with a digit
pub fn safe_field_name(name: &str) -> String {
    if starts_with_digit(name) {
        format!("'{}'", name)
    } else {
        name.to_string()
    }
}

pub(crate) fn starts_with_digit(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}
