//! Interpreting operation calls against the filesystem.
//!
//! For each call the resolver computes the target path, classifies the
//! return shape, performs the declared creation action, then produces it:
//! a bare path, a wrapped value, a nested binding, or an array or lazy
//! sequence of those built from a filtered walk.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::binding::Binding;
use crate::descriptor::{Collection, CreateAction, ElementShape, OperationDescriptor, TargetRule};
use crate::error::{Error, Result};
use crate::filter::FilterChain;
use crate::path::{ascend, check_subpath};
use crate::store::FileStore;
use crate::value::{Sequence, Value, Wrapped};
use crate::walk::Walker;

/// Resolve a declared (non built-in) operation.
pub(crate) fn resolve(binding: &Binding, name: &str, arg: Option<&str>) -> Result<Value> {
    let contract = binding.descriptor();
    let operation = contract
        .operation(name)
        .ok_or_else(|| Error::UnsupportedOperation {
            signature: format!("{}::{name}", contract.name()),
            reason: "no such operation is declared".to_string(),
        })?;

    check_arity(operation, arg)?;

    if let Some(body) = &operation.body {
        log::trace!("{}: running default body", operation.signature());
        return body(binding, arg);
    }

    let target = target_path(binding, operation, arg)?;
    log::debug!(
        "{} resolved to {}",
        operation.signature(),
        target.display()
    );
    // Misdeclared operations fail before anything touches the disk.
    let shape = operation.element.resolve()?;
    check_shape(operation)?;
    apply_action(
        binding.store().as_ref(),
        operation.action,
        &operation.signature(),
        &target,
    )?;
    produce(binding, operation, shape, target)
}

fn check_shape(operation: &OperationDescriptor) -> Result<()> {
    if operation.collection == Collection::Single
        && (operation.walk.is_some() || !operation.filters.is_empty())
    {
        return Err(Error::UnsupportedOperation {
            signature: operation.signature(),
            reason: "walk bounds and filters need an array or sequence return".to_string(),
        });
    }
    Ok(())
}

fn check_arity(operation: &OperationDescriptor, arg: Option<&str>) -> Result<()> {
    let invalid = |reason: String| Error::InvalidArgument {
        signature: operation.signature(),
        reason,
    };
    match (operation.takes_argument, arg) {
        (true, None) => Err(invalid("a subpath argument is required".to_string())),
        (false, Some(arg)) => Err(invalid(format!("takes no argument, got '{arg}'"))),
        (true, Some(arg)) => check_subpath(arg).map_err(invalid),
        (false, None) => Ok(()),
    }
}

fn target_path(
    binding: &Binding,
    operation: &OperationDescriptor,
    arg: Option<&str>,
) -> Result<PathBuf> {
    let anchor = binding.anchor();
    match &operation.target {
        TargetRule::Ascend(depth) => {
            ascend(anchor, *depth).ok_or_else(|| Error::AscendBeyondRoot {
                signature: operation.signature(),
                depth: *depth,
                anchor: anchor.to_path_buf(),
            })
        }
        TargetRule::Child { name_override } => Ok(match (arg, name_override) {
            (Some(arg), _) => anchor.join(arg),
            (None, Some(segment)) => anchor.join(segment),
            // Undirected collections enumerate the binding's own directory.
            (None, None) if operation.collection != Collection::Single => anchor.to_path_buf(),
            (None, None) => anchor.join(&operation.name),
        }),
    }
}

/// Run a creation action on `target`.
pub(crate) fn apply_action(
    store: &dyn FileStore,
    action: CreateAction,
    signature: &str,
    target: &Path,
) -> Result<()> {
    match action {
        CreateAction::None => Ok(()),
        CreateAction::CreateIfAbsent => create_if_absent(store, signature, target),
        CreateAction::CreateRecursive => create_recursive(store, signature, target),
    }
}

fn create_if_absent(store: &dyn FileStore, signature: &str, target: &Path) -> Result<()> {
    let failed = |source| Error::CreateIfAbsentFailed {
        signature: signature.to_string(),
        path: target.to_path_buf(),
        source,
    };
    if store.exists(target) {
        if store.is_dir(target) {
            return Ok(());
        }
        return Err(failed(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "exists and is not a directory",
        )));
    }
    match store.create_dir(target) {
        Ok(()) => {
            log::debug!("created {}", target.display());
            Ok(())
        }
        // Lost a race with another creator.
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && store.is_dir(target) => Ok(()),
        Err(e) => Err(failed(e)),
    }
}

fn create_recursive(store: &dyn FileStore, signature: &str, target: &Path) -> Result<()> {
    if store.is_dir(target) {
        return Ok(());
    }
    store
        .create_dir_all(target)
        .map_err(|source| Error::CreateRecursiveFailed {
            signature: signature.to_string(),
            path: target.to_path_buf(),
            source,
        })?;
    log::debug!("created {} and missing ancestors", target.display());
    Ok(())
}

fn produce(
    binding: &Binding,
    operation: &OperationDescriptor,
    shape: ElementShape,
    target: PathBuf,
) -> Result<Value> {
    let store = binding.store();

    if operation.collection == Collection::Single {
        if operation.must_exist
            && !matches!(shape, ElementShape::Nested(_))
            && !store.exists(&target)
        {
            return Err(Error::MissingTarget {
                signature: operation.signature(),
                path: target,
            });
        }
        return materialize(&shape, target, binding);
    }

    let elements = Elements {
        walker: Walker::new(
            Arc::clone(store),
            target,
            operation.walk.unwrap_or_default(),
        ),
        filters: operation.filters.clone(),
        shape,
        parent: binding.clone(),
    };
    match operation.collection {
        Collection::Array => Ok(Value::Array(elements.collect::<Result<Vec<_>>>()?)),
        _ => Ok(Value::Sequence(Sequence::new(elements))),
    }
}

fn materialize(shape: &ElementShape, path: PathBuf, parent: &Binding) -> Result<Value> {
    match shape {
        ElementShape::Path => Ok(Value::Path(path)),
        ElementShape::Wrapped(wrapper) => Ok(Value::Wrapped(Wrapped::new(
            wrapper.target(),
            wrapper.wrap(path)?,
        ))),
        ElementShape::Nested(contract) => {
            Ok(Value::Contract(parent.nested(Arc::clone(contract), path)))
        }
    }
}

/// Walked entries that pass the filter chain, mapped to the element shape.
struct Elements {
    walker: Walker,
    filters: FilterChain,
    shape: ElementShape,
    parent: Binding,
}

impl Iterator for Elements {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.walker.next()? {
                Err(e) => return Some(Err(e)),
                Ok(path) if self.filters.accepts(&path, self.parent.store().as_ref()) => {
                    return Some(materialize(&self.shape, path, &self.parent));
                }
                Ok(path) => log::trace!("filtered out {}", path.display()),
            }
        }
    }
}
