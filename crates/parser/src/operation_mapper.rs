//! Operation classification and CRUD mapping
//!
//! Maps HTTP verbs to canonical actions.

use restgen_common::{CanonicalAction, HttpVerb};

/// Classifies path operations into canonical actions
pub struct OperationMapper;

impl OperationMapper {
    /// Canonical action of a verb on an identified or collection path
    ///
    /// Verbs without a mapping (patch, head, options) return `None` and are
    /// dropped by the aggregator.
    ///
    /// # Examples
    /// ```
    /// use restgen_common::{CanonicalAction, HttpVerb};
    /// use restgen_parser::OperationMapper;
    ///
    /// assert_eq!(
    ///     OperationMapper::canonical_action(HttpVerb::Get, true),
    ///     Some(CanonicalAction::GetById)
    /// );
    /// assert_eq!(
    ///     OperationMapper::canonical_action(HttpVerb::Post, false),
    ///     Some(CanonicalAction::Create)
    /// );
    /// assert_eq!(OperationMapper::canonical_action(HttpVerb::Patch, true), None);
    /// ```
    pub fn canonical_action(verb: HttpVerb, identified: bool) -> Option<CanonicalAction> {
        match verb {
            HttpVerb::Get if identified => Some(CanonicalAction::GetById),
            HttpVerb::Get => Some(CanonicalAction::Get),
            HttpVerb::Post => Some(CanonicalAction::Create),
            HttpVerb::Put => Some(CanonicalAction::Update),
            HttpVerb::Delete => Some(CanonicalAction::Remove),
            HttpVerb::Patch | HttpVerb::Head | HttpVerb::Options => None,
        }
    }

    /// Whether a path template ends in an identifier token
    ///
    /// # Examples
    /// ```
    /// use restgen_parser::OperationMapper;
    ///
    /// assert!(OperationMapper::is_identified("/users/{id}"));
    /// assert!(OperationMapper::is_identified("/users/{ id }/"));
    /// assert!(!OperationMapper::is_identified("/users/{id}/phones"));
    /// ```
    pub fn is_identified(path: &str) -> bool {
        Self::id_segment(path).is_some()
    }

    /// The trailing `{token}` segment of a path, braces included
    pub fn id_segment(path: &str) -> Option<&str> {
        let last = path.trim_end_matches('/').rsplit('/').next()?;
        (last.len() > 2 && last.starts_with('{') && last.ends_with('}')).then_some(last)
    }

    /// Path with its trailing identifier segment removed
    ///
    /// # Examples
    /// ```
    /// use restgen_parser::OperationMapper;
    ///
    /// assert_eq!(OperationMapper::canonical_path("/users/{id}"), "/users");
    /// assert_eq!(
    ///     OperationMapper::canonical_path("/users/{userId}/phones/"),
    ///     "/users/{userId}/phones"
    /// );
    /// assert_eq!(OperationMapper::canonical_path("/{id}"), "/");
    /// ```
    pub fn canonical_path(path: &str) -> String {
        let trimmed = path.trim_end_matches('/');
        let canonical = match Self::id_segment(path) {
            Some(segment) => trimmed[..trimmed.len() - segment.len()].trim_end_matches('/'),
            None => trimmed,
        };
        if canonical.is_empty() {
            "/".to_string()
        } else {
            canonical.to_string()
        }
    }
}
