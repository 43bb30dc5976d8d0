//! Fully qualified entity names such as `/whisk.system/samples/date`.

use std::fmt;

/// Namespace used when a name does not carry one.
pub const DEFAULT_NAMESPACE: &str = "_";

const DELIMITER: char = '/';

/// An action or trigger name split into its namespace and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub namespace: String,
    pub name: String,
}

impl QualifiedName {
    /// Split a possibly qualified name.
    ///
    /// `/ns/pkg/action` yields namespace `ns` and name `pkg/action`.
    /// `/action` and `action` both resolve into the default namespace.
    /// Any other two-segment form keeps only its first segment.
    pub fn parse(qualified: &str) -> Self {
        let segments: Vec<&str> = qualified.split(DELIMITER).collect();

        if segments.len() > 2 {
            Self {
                namespace: segments[1].to_string(),
                name: segments[2..].join("/"),
            }
        } else {
            let name = if qualified.starts_with(DELIMITER) {
                segments[1]
            } else {
                segments[0]
            };
            Self {
                namespace: DEFAULT_NAMESPACE.to_string(),
                name: name.to_string(),
            }
        }
    }

    /// API path for a blocking action invocation.
    pub fn action_path(&self) -> String {
        self.api_path("actions")
    }

    /// API path for firing a trigger.
    pub fn trigger_path(&self) -> String {
        self.api_path("triggers")
    }

    fn api_path(&self, collection: &str) -> String {
        format!(
            "/api/v1/namespaces/{}/{}/{}?blocking=true",
            encode_segments(&self.namespace),
            collection,
            encode_segments(&self.name)
        )
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.namespace, self.name)
    }
}

fn encode_segments(path: &str) -> String {
    path.split(DELIMITER)
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(name: &str) -> (String, String) {
        let q = QualifiedName::parse(name);
        (q.namespace, q.name)
    }

    #[test]
    fn test_fully_qualified_with_package() {
        assert_eq!(
            parts("/whisk.system/samples/date"),
            ("whisk.system".into(), "samples/date".into())
        );
    }

    #[test]
    fn test_fully_qualified_without_package() {
        assert_eq!(parts("/guest/hello"), ("guest".into(), "hello".into()));
    }

    #[test]
    fn test_bare_and_slash_prefixed_names_are_equivalent() {
        assert_eq!(parts("hello"), ("_".into(), "hello".into()));
        assert_eq!(parts("/hello"), ("_".into(), "hello".into()));
    }

    #[test]
    fn test_two_segments_without_leading_slash_keep_first() {
        assert_eq!(parts("pkg/hello"), ("_".into(), "pkg".into()));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(parts(""), ("_".into(), "".into()));
        assert_eq!(parts("/"), ("_".into(), "".into()));
    }

    #[test]
    fn test_action_and_trigger_paths() {
        let q = QualifiedName::parse("/guest/demo/hello");
        assert_eq!(
            q.action_path(),
            "/api/v1/namespaces/guest/actions/demo/hello?blocking=true"
        );
        assert_eq!(
            q.trigger_path(),
            "/api/v1/namespaces/guest/triggers/demo/hello?blocking=true"
        );
    }

    #[test]
    fn test_path_segments_are_percent_encoded() {
        let q = QualifiedName::parse("my action");
        assert_eq!(
            q.action_path(),
            "/api/v1/namespaces/_/actions/my%20action?blocking=true"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(QualifiedName::parse("hello").to_string(), "/_/hello");
    }
}
