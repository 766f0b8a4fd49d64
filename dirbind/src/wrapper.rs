//! Adapting raw paths into application value types.
//!
//! A type declares how it is built from a path through
//! [`SchemaBuilder::constructor`](crate::SchemaBuilder::constructor) or one
//! or more named [`SchemaBuilder::factory`](crate::SchemaBuilder::factory)
//! members. Selection is deterministic: the constructor wins; otherwise the
//! factory whose name sorts first.

use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{BoxError, Error, Result};

/// Member name reported for path constructors.
pub const CONSTRUCTOR_MEMBER: &str = "new";

pub(crate) type BuildFn =
    Arc<dyn Fn(PathBuf) -> std::result::Result<Box<dyn Any + Send>, BoxError> + Send + Sync>;

/// How a wrapper builds its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperKind {
    /// A single-argument path constructor.
    Constructor,
    /// A named factory taking a path.
    Factory,
}

/// The selected constructor or factory for one target type.
#[derive(Clone)]
pub struct WrapperDescriptor {
    target: String,
    member: String,
    kind: WrapperKind,
    build: BuildFn,
}

impl WrapperDescriptor {
    /// The target type name.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The selected member name.
    #[must_use]
    pub fn member(&self) -> &str {
        &self.member
    }

    /// Whether a constructor or a factory was selected.
    #[must_use]
    pub fn kind(&self) -> WrapperKind {
        self.kind
    }

    /// Build a value from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrapperConstructionFailed`] with the member's error
    /// as source.
    pub fn wrap(&self, path: PathBuf) -> Result<Box<dyn Any + Send>> {
        (self.build)(path.clone()).map_err(|source| Error::WrapperConstructionFailed {
            target: self.target.clone(),
            member: self.member.clone(),
            path,
            source,
        })
    }
}

impl fmt::Debug for WrapperDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapperDescriptor")
            .field("target", &self.target)
            .field("member", &self.member)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Everything a type declared; [`select`](Self::select) picks one.
#[derive(Default)]
pub(crate) struct WrapperCandidates {
    constructor: Option<BuildFn>,
    factories: Vec<(String, BuildFn)>,
}

impl WrapperCandidates {
    pub(crate) fn set_constructor(&mut self, build: BuildFn) {
        self.constructor = Some(build);
    }

    pub(crate) fn add_factory(&mut self, name: &str, build: BuildFn) {
        self.factories.push((name.to_string(), build));
    }

    pub(crate) fn select(&self, target: &str) -> Option<WrapperDescriptor> {
        if let Some(build) = &self.constructor {
            return Some(WrapperDescriptor {
                target: target.to_string(),
                member: CONSTRUCTOR_MEMBER.to_string(),
                kind: WrapperKind::Constructor,
                build: Arc::clone(build),
            });
        }
        self.factories
            .iter()
            .min_by(|a, b| a.0.cmp(&b.0))
            .map(|(name, build)| WrapperDescriptor {
                target: target.to_string(),
                member: name.clone(),
                kind: WrapperKind::Factory,
                build: Arc::clone(build),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn build_tagged(tag: &'static str) -> BuildFn {
        Arc::new(move |path: PathBuf| {
            Ok(Box::new(format!("{tag}:{}", path.display())) as Box<dyn Any + Send>)
        })
    }

    fn unwrap_string(value: Box<dyn Any + Send>) -> String {
        *value.downcast::<String>().unwrap()
    }

    #[test]
    fn test_nothing_declared() {
        assert!(WrapperCandidates::default().select("Pom").is_none());
    }

    #[test]
    fn test_constructor_preferred_over_factories() {
        let mut candidates = WrapperCandidates::default();
        candidates.add_factory("aaa", build_tagged("factory"));
        candidates.set_constructor(build_tagged("ctor"));

        let selected = candidates.select("Pom").unwrap();
        assert_eq!(selected.kind(), WrapperKind::Constructor);
        assert_eq!(selected.member(), CONSTRUCTOR_MEMBER);
        assert_eq!(
            unwrap_string(selected.wrap(PathBuf::from("/x")).unwrap()),
            "ctor:/x"
        );
    }

    #[test]
    fn test_factories_tie_break_lexically() {
        let mut candidates = WrapperCandidates::default();
        candidates.add_factory("parse", build_tagged("parse"));
        candidates.add_factory("of", build_tagged("of"));
        candidates.add_factory("load", build_tagged("load"));

        let selected = candidates.select("Pom").unwrap();
        assert_eq!(selected.kind(), WrapperKind::Factory);
        assert_eq!(selected.member(), "load");
    }

    #[test]
    fn test_construction_failure_is_chained() {
        let mut candidates = WrapperCandidates::default();
        candidates.add_factory(
            "parse",
            Arc::new(|_path: PathBuf| Err::<Box<dyn Any + Send>, BoxError>("not xml".into())),
        );
        let err = candidates
            .select("Pom")
            .unwrap()
            .wrap(PathBuf::from("/repo/pom.xml"))
            .unwrap_err();
        match err {
            Error::WrapperConstructionFailed {
                target,
                member,
                path,
                source,
            } => {
                assert_eq!(target, "Pom");
                assert_eq!(member, "parse");
                assert_eq!(path, Path::new("/repo/pom.xml"));
                assert_eq!(source.to_string(), "not xml");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
