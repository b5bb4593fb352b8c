//! Binding of [`Configure`] records against a [`SourceMap`].
//!
//! A record describes its own shape by registering each field with
//! [`Fields`]. The same walk either binds values or only collects
//! [`FieldDescriptor`]s, depending on whether a source is attached.

use super::error::{FieldError, FieldErrors};
use super::field::{Field, FieldDescriptor};
use super::source::SourceMap;
use super::value::FromEnv;
use super::ConfigError;

/// A record that can be populated from environment-style key/value text.
///
/// Fields are registered in declaration order. Nested records are registered
/// with [`Fields::section`] and must implement `Configure` themselves.
///
/// ```
/// use envbind::{Configure, Field, Fields};
///
/// #[derive(Default)]
/// struct Database {
///     host: String,
///     port: u16,
/// }
///
/// impl Configure for Database {
///     fn configure(&mut self, fields: &mut Fields<'_>) {
///         fields.value(Field::new("host").required(), &mut self.host);
///         fields.value(Field::new("port").default("5432"), &mut self.port);
///     }
/// }
///
/// #[derive(Default)]
/// struct AppConfig {
///     database: Database,
/// }
///
/// impl Configure for AppConfig {
///     fn configure(&mut self, fields: &mut Fields<'_>) {
///         fields.section(Field::new("database"), &mut self.database);
///     }
/// }
/// ```
pub trait Configure {
    fn configure(&mut self, fields: &mut Fields<'_>);
}

#[derive(Debug, Default)]
struct Report {
    descriptors: Vec<FieldDescriptor>,
    errors: Vec<FieldError>,
    // Leaves resolved from the source map, defaults excluded.
    resolved: usize,
}

/// One level of the shape walk: the key prefix and access path of a record.
#[derive(Debug)]
pub struct Fields<'a> {
    prefix: String,
    path: Vec<String>,
    source: Option<&'a SourceMap>,
    report: &'a mut Report,
}

impl<'a> Fields<'a> {
    fn root(source: Option<&'a SourceMap>, report: &'a mut Report) -> Self {
        Self {
            prefix: String::new(),
            path: Vec::new(),
            source,
            report,
        }
    }

    /// Key prefix of this level, e.g. `DATABASE_` inside a `database` section.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Registers a leaf field.
    pub fn value<T: FromEnv>(&mut self, field: Field, target: &mut T) {
        if field.is_ignored() {
            return;
        }
        let key = format!("{}{}", self.prefix, field.segment()).to_uppercase();
        let path = self.child_path(&field);
        let descriptor = field.into_descriptor(path, key, T::KIND);

        if let Some(source) = self.source {
            self.resolve(&descriptor, source, target);
        }
        self.report.descriptors.push(descriptor);
    }

    /// Registers a nested record whose fields are keyed under this field's segment.
    pub fn section<S: Configure>(&mut self, field: Field, target: &mut S) {
        if field.is_ignored() {
            return;
        }
        let mut nested = self.nested(&field, None);
        target.configure(&mut nested);
    }

    /// Registers an optional nested record.
    ///
    /// An existing section is bound in place. A missing one is bound into
    /// `S::default()` and kept only if at least one of its leaves was found
    /// in the source map; otherwise it stays `None` and its errors are dropped.
    pub fn optional_section<S>(&mut self, field: Field, target: &mut Option<S>)
    where
        S: Configure + Default,
    {
        if field.is_ignored() {
            return;
        }
        if let Some(section) = target.as_mut() {
            self.section(field, section);
            return;
        }

        let mut report = Report::default();
        let mut section = S::default();
        {
            let mut nested = self.nested(&field, Some(&mut report));
            section.configure(&mut nested);
        }

        self.report.descriptors.append(&mut report.descriptors);
        if report.resolved > 0 {
            self.report.errors.append(&mut report.errors);
            self.report.resolved += report.resolved;
            *target = Some(section);
        } else if !report.errors.is_empty() {
            tracing::trace!(
                prefix = %self.prefix,
                section = field.declared_name(),
                "optional section absent, dropping its errors"
            );
        }
    }

    fn nested<'b>(&'b mut self, field: &Field, report: Option<&'b mut Report>) -> Fields<'b> {
        let prefix = format!("{}{}_", self.prefix, field.segment()).to_uppercase();
        let path = self.child_path(field);
        Fields {
            prefix,
            path,
            source: self.source,
            report: match report {
                Some(report) => report,
                None => &mut *self.report,
            },
        }
    }

    fn child_path(&self, field: &Field) -> Vec<String> {
        let mut path = self.path.clone();
        path.push(field.declared_name().to_string());
        path
    }

    fn resolve<T: FromEnv>(
        &mut self,
        descriptor: &FieldDescriptor,
        source: &SourceMap,
        target: &mut T,
    ) {
        let key = &descriptor.key;
        let raw = match source.get(key).filter(|value| !value.is_empty()) {
            Some(value) => {
                self.report.resolved += 1;
                tracing::trace!(key = %key, "resolved from sources");
                value
            }
            None => match descriptor.default.as_deref() {
                Some(default) => {
                    tracing::trace!(key = %key, "using default");
                    default
                }
                None if descriptor.required => {
                    self.report
                        .errors
                        .push(FieldError::Missing { key: key.clone() });
                    return;
                }
                None => return,
            },
        };

        match T::from_env(raw, &descriptor.separator) {
            Ok(value) => *target = value,
            Err(detail) => self.report.errors.push(FieldError::Invalid {
                key: key.clone(),
                kind: descriptor.kind,
                detail,
            }),
        }
    }
}

/// Populates `target` from `source`.
///
/// Every field is visited even after a failure; all problems come back
/// together as [`ConfigError::Fields`]. On error the record may be partially
/// populated and should not be used.
pub fn bind<T: Configure + ?Sized>(target: &mut T, source: &SourceMap) -> Result<(), ConfigError> {
    let mut report = Report::default();
    {
        let mut fields = Fields::root(Some(source), &mut report);
        target.configure(&mut fields);
    }

    tracing::debug!(
        fields = report.descriptors.len(),
        resolved = report.resolved,
        errors = report.errors.len(),
        "bound configuration"
    );

    if report.errors.is_empty() {
        Ok(())
    } else {
        Err(FieldErrors::new(report.errors).into())
    }
}

/// Lists the leaf fields of `T` without binding anything.
///
/// Optional sections are described as if present.
pub fn describe<T: Configure + Default>() -> Vec<FieldDescriptor> {
    let mut target = T::default();
    let mut report = Report::default();
    {
        let mut fields = Fields::root(None, &mut report);
        target.configure(&mut fields);
    }
    report.descriptors
}
