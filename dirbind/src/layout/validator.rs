//! Layout validation.
//!
//! Checks a parsed layout for everything that would otherwise surface only
//! when an operation is first called: dangling contract references, walk
//! bounds on single values, conflicting target rules and the like.

use std::collections::HashSet;
use std::path::Path;

use crate::binding::is_builtin;
use crate::descriptor::Collection;
use crate::error::{Error, Result};
use crate::layout::schema::{ContractSpec, FilterSpec, LayoutConfig, OperationSpec, PATH_ELEMENT};
use crate::walk::WalkBounds;

/// Validates layouts.
///
/// # Examples
///
/// ```
/// use dirbind::LayoutConfig;
/// use dirbind::layout::LayoutValidator;
///
/// let layout = LayoutConfig::from_yaml_str("root: m\ncontracts:\n  m: {}\n").unwrap();
/// LayoutValidator::validate(&layout).unwrap();
/// ```
pub struct LayoutValidator;

impl LayoutValidator {
    /// Validate a complete layout.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(layout: &LayoutConfig) -> Result<()> {
        let root = layout.root.as_deref().ok_or_else(|| Error::Validation {
            field: "root".into(),
            message: "A root contract is required".into(),
        })?;
        if !layout.contracts.contains_key(root) {
            return Err(Error::Validation {
                field: "root".into(),
                message: format!("Unknown contract '{root}'"),
            });
        }

        for (name, contract) in &layout.contracts {
            Self::validate_contract(layout, name, contract)?;
        }
        Ok(())
    }

    fn validate_contract(layout: &LayoutConfig, name: &str, contract: &ContractSpec) -> Result<()> {
        if name.trim().is_empty() || name == PATH_ELEMENT {
            return Err(Error::Validation {
                field: format!("contracts.{name}"),
                message: format!("'{name}' cannot be used as a contract name"),
            });
        }

        let mut seen = HashSet::new();
        for (index, operation) in contract.operations.iter().enumerate() {
            let field = format!("contracts.{name}.operations[{index}]");
            if !seen.insert(operation.name.as_str()) {
                return Err(Error::Validation {
                    field,
                    message: format!("Duplicate operation '{}'", operation.name),
                });
            }
            Self::validate_operation(layout, &field, operation)?;
        }
        Ok(())
    }

    fn validate_operation(layout: &LayoutConfig, field: &str, op: &OperationSpec) -> Result<()> {
        let fail = |suffix: &str, message: String| Error::Validation {
            field: format!("{field}{suffix}"),
            message,
        };

        let name = op.name.trim();
        if name.is_empty() {
            return Err(fail(".name", "Cannot be empty or only whitespace".into()));
        }
        if is_builtin(name) {
            return Err(fail(
                ".name",
                format!("'{name}' shadows a built-in capability"),
            ));
        }

        let element = op.element();
        if element != PATH_ELEMENT && !layout.contracts.contains_key(element) {
            return Err(fail(".returns", format!("Unknown contract '{element}'")));
        }

        if op.collection() == Collection::Single {
            if op.walk.is_some() {
                return Err(fail(
                    ".walk",
                    "Walk bounds need collection: array or sequence".into(),
                ));
            }
            if !op.filters.is_empty() {
                return Err(fail(
                    ".filters",
                    "Filters need collection: array or sequence".into(),
                ));
            }
        }

        if let Some(walk) = op.walk {
            WalkBounds::from_raw(walk.min_depth, walk.max_depth)
                .map_err(|message| fail(".walk", message))?;
        }

        for filter in &op.filters {
            Self::validate_filter(filter).map_err(|message| fail(".filters", message))?;
        }

        if op.ascend.is_some() && (op.path.is_some() || op.argument) {
            return Err(fail(
                ".ascend",
                "Cannot be combined with path or argument".into(),
            ));
        }

        if let Some(path) = &op.path {
            if path.trim().is_empty() || Path::new(path).is_absolute() {
                return Err(fail(".path", format!("'{path}' must be a relative path")));
            }
        }

        Ok(())
    }

    fn validate_filter(filter: &FilterSpec) -> std::result::Result<(), String> {
        match filter {
            FilterSpec::Glob(pattern) => glob::Pattern::new(pattern)
                .map(|_| ())
                .map_err(|e| format!("Invalid glob '{pattern}': {e}")),
            FilterSpec::HasChild(value) | FilterSpec::Extension(value)
                if value.trim().is_empty() =>
            {
                Err("Filter argument cannot be empty".into())
            }
            _ => Ok(()),
        }
    }
}
