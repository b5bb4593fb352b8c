//! Field declarations and the descriptors derived from them.

use std::fmt;

use serde::Serialize;

/// Default separator for list fields.
pub const DEFAULT_SEPARATOR: &str = ",";

/// The closed set of element types text can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Text,
    Int,
    Uint,
    Float,
    Bool,
    Duration,
}

impl ScalarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Text => "string",
            ScalarKind::Int => "int",
            ScalarKind::Uint => "uint",
            ScalarKind::Float => "float",
            ScalarKind::Bool => "bool",
            ScalarKind::Duration => "duration",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic type of a leaf field: a scalar, or a separated list of scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Scalar(ScalarKind),
    Seq(ScalarKind),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar(kind) => write!(f, "{kind}"),
            ValueKind::Seq(kind) => write!(f, "list of {kind}"),
        }
    }
}

/// Declaration of one field of a [`Configure`](super::Configure) record.
///
/// The declared name is the field's own name; it is upper-cased to form the
/// key segment unless overridden with [`name`](Self::name).
///
/// ```
/// use envbind::Field;
///
/// let field = Field::new("hosts").required().sep(";");
/// let port = Field::new("port").default("5432");
/// # let _ = (field, port);
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct Field {
    declared: String,
    rename: Option<String>,
    required: bool,
    default: Option<String>,
    separator: String,
    ignored: bool,
}

impl Field {
    pub fn new(declared: impl Into<String>) -> Self {
        Self {
            declared: declared.into(),
            rename: None,
            required: false,
            default: None,
            separator: DEFAULT_SEPARATOR.to_string(),
            ignored: false,
        }
    }

    /// Overrides the key segment derived from the declared name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.rename = (!name.is_empty()).then_some(name);
        self
    }

    /// Fails the bind when no value and no default can be resolved.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Fallback text, coerced like any source value. An empty default is no default.
    pub fn default(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.default = (!value.is_empty()).then_some(value);
        self
    }

    /// Separator for list fields. An empty separator keeps `,`.
    pub fn sep(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        if !separator.is_empty() {
            self.separator = separator;
        }
        self
    }

    /// Excludes the field from binding and description.
    pub fn ignore(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub fn declared_name(&self) -> &str {
        &self.declared
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Key segment contributed by this field, not yet prefixed.
    pub fn segment(&self) -> String {
        self.rename
            .as_deref()
            .unwrap_or(&self.declared)
            .to_uppercase()
    }

    pub(crate) fn into_descriptor(
        self,
        path: Vec<String>,
        key: String,
        kind: ValueKind,
    ) -> FieldDescriptor {
        FieldDescriptor {
            path,
            key,
            required: self.required,
            default: self.default,
            separator: self.separator,
            kind,
        }
    }
}

/// Everything the binder knows about one leaf field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Declared names from the root record down to the leaf.
    pub path: Vec<String>,
    pub key: String,
    pub required: bool,
    pub default: Option<String>,
    pub separator: String,
    pub kind: ValueKind,
}
