use std::fmt;

/// Why a singleton accessor could not produce an instance.
///
/// None of these are fatal: the slot stays empty and the next access retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireError {
    /// No live object carries the component and the strategy does not create one.
    LookupFailure { type_name: &'static str },

    /// No template resource exists at the derived path.
    TemplateMissing { path: String },

    /// The template was instantiated but the copy lacks the component. The copy stays in the
    /// scene.
    MissingComponent {
        path: String,
        type_name: &'static str,
    },
}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquireError::LookupFailure { type_name } => {
                write!(f, "no object with component {type_name} found in scene")
            }
            AcquireError::TemplateMissing { path } => {
                write!(f, "template resource not found at path {path}")
            }
            AcquireError::MissingComponent { path, type_name } => {
                write!(
                    f,
                    "object instantiated from {path} has no component {type_name}"
                )
            }
        }
    }
}

impl std::error::Error for AcquireError {}

#[test]
fn display_includes_context() {
    let err = AcquireError::TemplateMissing {
        path: "Prefabs/Foo/Foo".into(),
    };
    assert_eq!(
        err.to_string(),
        "template resource not found at path Prefabs/Foo/Foo"
    );

    let err = AcquireError::LookupFailure { type_name: "Foo" };
    assert!(err.to_string().contains("Foo"));
}
