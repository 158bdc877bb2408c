//! Named parameters and their binding to wire names.

use std::fmt;

use crate::kind::ConnectionKind;

/// One named parameter supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    value: Option<String>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Name without any provider prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Ordered list of named parameters.
///
/// # Example
///
/// ```rust,ignore
/// let params = Parameters::new()
///     .with("customer_id", "42")
///     .with_null("region");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    items: Vec<Parameter>,
}

impl Parameters {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a parameter with a text value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, Some(value.into()));
        self
    }

    /// Append a parameter that binds as SQL `NULL`.
    #[must_use]
    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.push(name, None);
        self
    }

    /// Append a parameter; `None` binds as SQL `NULL`.
    pub fn push(&mut self, name: impl Into<String>, value: Option<String>) {
        self.items.push(Parameter::new(name, value));
    }

    /// Build from an alternating `name, value, name, value, ...` list.
    ///
    /// Lists shorter than two entries, or with an odd number of entries, bind
    /// nothing. A `None` in a name position is treated as an empty name.
    #[must_use]
    pub fn from_flat(flat: &[Option<&str>]) -> Self {
        if flat.len() < 2 {
            return Self::new();
        }
        if flat.len() % 2 != 0 {
            tracing::warn!(
                len = flat.len(),
                "Ignoring parameter list with an odd number of entries"
            );
            return Self::new();
        }

        let items = flat
            .chunks_exact(2)
            .map(|pair| Parameter::new(pair[0].unwrap_or_default(), pair[1].map(str::to_owned)))
            .collect();
        Self { items }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.items.iter()
    }

    /// Bind every parameter using the naming convention of `kind`.
    #[must_use]
    pub fn bind(&self, kind: ConnectionKind) -> Vec<BoundParameter> {
        self.items
            .iter()
            .map(|p| BoundParameter::bind(kind, p))
            .collect()
    }
}

impl<N, V> FromIterator<(N, Option<V>)> for Parameters
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, Option<V>)>>(iter: I) -> Self {
        Self {
            items: iter
                .into_iter()
                .map(|(name, value)| Parameter::new(name, value.map(Into::into)))
                .collect(),
        }
    }
}

/// Value as it travels to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// Explicit SQL `NULL`.
    Null,
    /// Text value.
    Text(String),
}

impl SqlValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Text(s) => write!(f, "'{s}'"),
        }
    }
}

/// Parameter after provider naming has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundParameter {
    name: String,
    wire_name: String,
    value: SqlValue,
}

impl BoundParameter {
    fn bind(kind: ConnectionKind, parameter: &Parameter) -> Self {
        let value = parameter
            .value
            .as_ref()
            .map_or(SqlValue::Null, |v| SqlValue::Text(v.clone()));
        Self {
            name: parameter.name.clone(),
            wire_name: format!("{}{}", kind.parameter_prefix(), parameter.name),
            value,
        }
    }

    /// Name as supplied, without the provider prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name including the provider prefix, e.g. `@id` or `@_id`.
    #[must_use]
    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    #[must_use]
    pub const fn value(&self) -> &SqlValue {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_server_binding() {
        let bound = Parameters::new().with("id", "7").bind(ConnectionKind::SqlServer);
        assert_eq!(bound.len(), 1);
        assert_eq!(bound[0].wire_name(), "@id");
        assert_eq!(bound[0].value(), &SqlValue::Text("7".to_string()));
    }

    #[test]
    fn test_mysql_binding() {
        let bound = Parameters::new().with("id", "7").bind(ConnectionKind::MySql);
        assert_eq!(bound.len(), 1);
        assert_eq!(bound[0].wire_name(), "@_id");
        assert_eq!(bound[0].name(), "id");
        assert_eq!(bound[0].value().as_str(), Some("7"));
    }

    #[test]
    fn test_null_binds_as_sql_null() {
        let bound = Parameters::from_flat(&[Some("id"), None]).bind(ConnectionKind::SqlServer);
        assert_eq!(bound.len(), 1);
        assert!(bound[0].value().is_null());
        assert_eq!(bound[0].value().to_string(), "NULL");
    }

    #[test]
    fn test_from_flat_pairs_in_order() {
        let params = Parameters::from_flat(&[Some("a"), Some("1"), Some("b"), Some("2")]);
        let names: Vec<_> = params.iter().map(Parameter::name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(params.iter().nth(1).and_then(Parameter::value), Some("2"));
    }

    #[test]
    fn test_from_flat_too_short_binds_nothing() {
        assert!(Parameters::from_flat(&[]).is_empty());
        assert!(Parameters::from_flat(&[Some("id")]).is_empty());
    }

    #[test]
    fn test_from_flat_odd_length_binds_nothing() {
        let params = Parameters::from_flat(&[Some("a"), Some("1"), Some("b")]);
        assert!(params.is_empty());
        assert!(params.bind(ConnectionKind::MySql).is_empty());
    }

    #[test]
    fn test_from_iterator() {
        let params: Parameters = [("id", Some("7")), ("note", None)].into_iter().collect();
        assert_eq!(params.len(), 2);
        let bound = params.bind(ConnectionKind::MySql);
        assert_eq!(bound[1].wire_name(), "@_note");
        assert!(bound[1].value().is_null());
    }

    #[test]
    fn test_binding_preserves_order() {
        let bound = Parameters::new()
            .with("z", "1")
            .with_null("a")
            .with("m", "")
            .bind(ConnectionKind::SqlServer);
        let names: Vec<_> = bound.iter().map(BoundParameter::wire_name).collect();
        assert_eq!(names, ["@z", "@a", "@m"]);
        assert_eq!(bound[2].value(), &SqlValue::Text(String::new()));
    }
}
