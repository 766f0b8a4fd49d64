//! Dynamic results of operation calls.
//!
//! [`Binding::call`](crate::Binding::call) returns a [`Value`]; the typed
//! helpers on `Binding` convert it into the shape the caller expects.

use std::any::Any;
use std::fmt;
use std::path::PathBuf;

use crate::binding::Binding;
use crate::descriptor::short_type_name;
use crate::error::{Error, Result};
use crate::schema::Schema;

/// A value produced by a path constructor or factory.
pub struct Wrapped {
    type_name: String,
    value: Box<dyn Any + Send>,
}

impl Wrapped {
    pub(crate) fn new(type_name: &str, value: Box<dyn Any + Send>) -> Self {
        Self {
            type_name: type_name.to_string(),
            value,
        }
    }

    /// Name of the wrapped type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Recover the concrete value, or give `self` back on mismatch.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged if the value is not a `T`.
    pub fn downcast<T: 'static>(self) -> std::result::Result<T, Self> {
        match self.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self {
                type_name: self.type_name,
                value,
            }),
        }
    }
}

impl fmt::Debug for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wrapped({})", self.type_name)
    }
}

/// A lazy, forward-only sequence of values.
///
/// Each call of a sequence operation starts a fresh enumeration.
pub struct Sequence {
    inner: Box<dyn Iterator<Item = Result<Value>> + Send>,
}

impl Sequence {
    pub(crate) fn new(inner: impl Iterator<Item = Result<Value>> + Send + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

impl Iterator for Sequence {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sequence(..)")
    }
}

/// The result of invoking an operation.
#[derive(Debug)]
pub enum Value {
    /// No result (mutating built-ins).
    Unit,
    /// A boolean (`exists`).
    Bool(bool),
    /// A bare path.
    Path(PathBuf),
    /// A wrapped application value.
    Wrapped(Wrapped),
    /// A nested binding.
    Contract(Binding),
    /// An eagerly collected list.
    Array(Vec<Value>),
    /// A lazy sequence.
    Sequence(Sequence),
}

impl Value {
    /// Short name of the variant, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Bool(_) => "bool",
            Self::Path(_) => "path",
            Self::Wrapped(_) => "wrapped value",
            Self::Contract(_) => "contract",
            Self::Array(_) => "array",
            Self::Sequence(_) => "sequence",
        }
    }

    fn mismatch(&self, expected: &str) -> Error {
        let found = match self {
            Self::Wrapped(w) => w.type_name().to_string(),
            Self::Contract(b) => b.contract_name().to_string(),
            other => other.kind().to_string(),
        };
        Error::TypeMismatch {
            expected: expected.to_string(),
            found,
        }
    }

    /// The bare path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other variant.
    pub fn into_path(self) -> Result<PathBuf> {
        match self {
            Self::Path(path) => Ok(path),
            other => Err(other.mismatch("path")),
        }
    }

    /// The boolean.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other variant.
    pub fn into_bool(self) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(b),
            other => Err(other.mismatch("bool")),
        }
    }

    /// The nested binding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other variant.
    pub fn into_binding(self) -> Result<Binding> {
        match self {
            Self::Contract(binding) => Ok(binding),
            other => Err(other.mismatch("contract")),
        }
    }

    /// A wrapped value or a nested contract, as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the value is not a `T`.
    pub fn into_typed<T: Schema>(self) -> Result<T> {
        let expected = short_type_name(std::any::type_name::<T>());
        match self {
            Self::Wrapped(wrapped) => wrapped.downcast::<T>().map_err(|w| Error::TypeMismatch {
                expected,
                found: w.type_name,
            }),
            Self::Contract(binding) => binding.into_contract::<T>(),
            other => Err(other.mismatch(&expected)),
        }
    }

    /// The elements of an array or sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for single values.
    pub fn into_values(self) -> Result<Sequence> {
        match self {
            Self::Array(values) => Ok(Sequence::new(values.into_iter().map(Ok))),
            Self::Sequence(sequence) => Ok(sequence),
            other => Err(other.mismatch("array or sequence")),
        }
    }

    /// Collect an array or sequence of paths.
    ///
    /// # Errors
    ///
    /// Returns the first enumeration error or [`Error::TypeMismatch`].
    pub fn into_paths(self) -> Result<Vec<PathBuf>> {
        self.into_values()?
            .map(|value| value.and_then(Value::into_path))
            .collect()
    }

    /// Collect an array or sequence of `T`.
    ///
    /// # Errors
    ///
    /// Returns the first enumeration error or [`Error::TypeMismatch`].
    pub fn into_vec<T: Schema>(self) -> Result<Vec<T>> {
        self.into_values()?
            .map(|value| value.and_then(Value::into_typed::<T>))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;

    #[derive(Debug, PartialEq)]
    struct Pom(PathBuf);

    impl Schema for Pom {
        fn schema(s: &mut SchemaBuilder<Self>) {
            s.from_path(Pom);
        }
    }

    #[derive(Debug)]
    struct Other;

    impl Schema for Other {
        fn schema(_: &mut SchemaBuilder<Self>) {}
    }

    fn wrapped_pom(path: &str) -> Value {
        Value::Wrapped(Wrapped::new("Pom", Box::new(Pom(PathBuf::from(path)))))
    }

    #[test]
    fn test_into_path() {
        let value = Value::Path(PathBuf::from("/a"));
        assert_eq!(value.into_path().unwrap(), PathBuf::from("/a"));
        let err = Value::Bool(true).into_path().unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { ref found, .. } if found == "bool"));
    }

    #[test]
    fn test_into_typed_downcasts() {
        let pom = wrapped_pom("/a/pom.xml").into_typed::<Pom>().unwrap();
        assert_eq!(pom, Pom(PathBuf::from("/a/pom.xml")));
    }

    #[test]
    fn test_into_typed_mismatch_names_both_types() {
        let err = wrapped_pom("/a/pom.xml").into_typed::<Other>().unwrap_err();
        match err {
            Error::TypeMismatch { expected, found } => {
                assert_eq!(expected, "Other");
                assert_eq!(found, "Pom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_array_conversions() {
        let array = Value::Array(vec![
            Value::Path(PathBuf::from("/a")),
            Value::Path(PathBuf::from("/b")),
        ]);
        assert_eq!(
            array.into_paths().unwrap(),
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );

        let poms = Value::Array(vec![wrapped_pom("/x"), wrapped_pom("/y")])
            .into_vec::<Pom>()
            .unwrap();
        assert_eq!(poms.len(), 2);
    }

    #[test]
    fn test_sequence_propagates_errors() {
        let sequence = Sequence::new(
            vec![
                Ok(Value::Path(PathBuf::from("/a"))),
                Err(Error::InvalidPath {
                    path: PathBuf::from("/b"),
                    reason: "boom".to_string(),
                }),
            ]
            .into_iter(),
        );
        assert!(Value::Sequence(sequence).into_paths().is_err());
    }

    #[test]
    fn test_single_value_is_not_a_collection() {
        assert!(Value::Unit.into_values().is_err());
    }
}
