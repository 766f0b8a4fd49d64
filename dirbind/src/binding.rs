//! Live bindings of contracts to filesystem anchors.
//!
//! A [`Binding`] pairs a contract with an anchor path and a shared
//! [`FileStore`]. It is a small value: cloning is cheap, and two bindings
//! are equal when they bind the same contract to the same anchor. Every
//! binding answers the built-in capability methods directly; all other
//! operations go through the contract's descriptor table.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::descriptor::{
    short_type_name, ContractDescriptor, ContractKey, ContractLookup, CreateAction,
};
use crate::error::{Error, Result};
use crate::path::check_subpath;
use crate::resolver;
use crate::schema::{type_descriptor, Schema};
use crate::store::{FileStore, LocalStore};
use crate::value::{Sequence, Value};
use crate::walk::{WalkBounds, Walker};

/// Capability methods every binding answers before consulting its
/// contract.
pub const BUILTIN_OPERATIONS: &[&str] = &[
    "anchor",
    "get",
    "parent",
    "create_if_absent",
    "create_recursive",
    "delete_recursive",
    "exists",
    "resolve_child",
    "walk",
    "files_only",
];

/// True if `name` is a built-in capability method.
#[must_use]
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_OPERATIONS.contains(&name)
}

/// Bind contract `C` to `anchor` on the local filesystem.
///
/// No I/O happens here; the anchor is kept exactly as given.
///
/// # Errors
///
/// Returns [`Error::NotAContract`] if `C` declares no contract.
pub fn bind<C: Schema>(anchor: impl Into<PathBuf>) -> Result<C> {
    bind_with_store(anchor, Arc::new(LocalStore::new()))
}

/// Bind contract `C` to `anchor` on the given store.
///
/// # Errors
///
/// Returns [`Error::NotAContract`] if `C` declares no contract.
pub fn bind_with_store<C: Schema>(
    anchor: impl Into<PathBuf>,
    store: Arc<dyn FileStore>,
) -> Result<C> {
    let descriptor = type_descriptor::<C>();
    let contract = descriptor.contract().ok_or_else(|| Error::NotAContract {
        target: descriptor.name().to_string(),
    })?;
    let binding = Binding::new(Arc::clone(contract), anchor.into(), store);
    log::trace!("bound {binding:?}");
    binding.into_contract()
}

/// A contract bound to an anchor path.
#[derive(Clone)]
pub struct Binding {
    contract: Arc<ContractDescriptor>,
    anchor: PathBuf,
    store: Arc<dyn FileStore>,
    // Keeps a layout catalog alive while bindings from it exist.
    scope: Option<Arc<dyn ContractLookup>>,
}

impl Binding {
    pub(crate) fn new(
        contract: Arc<ContractDescriptor>,
        anchor: PathBuf,
        store: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            contract,
            anchor,
            store,
            scope: None,
        }
    }

    pub(crate) fn with_scope(mut self, scope: Arc<dyn ContractLookup>) -> Self {
        self.scope = Some(scope);
        self
    }

    /// A binding of `contract` at `anchor` sharing this binding's store and
    /// catalog.
    pub(crate) fn nested(&self, contract: Arc<ContractDescriptor>, anchor: PathBuf) -> Self {
        Self {
            contract,
            anchor,
            store: Arc::clone(&self.store),
            scope: self.scope.clone(),
        }
    }

    /// The contract descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &Arc<ContractDescriptor> {
        &self.contract
    }

    /// The contract name.
    #[must_use]
    pub fn contract_name(&self) -> &str {
        self.contract.name()
    }

    /// The shared file store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn FileStore> {
        &self.store
    }

    /// Turn this binding into the contract type `C`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the binding's contract is not `C`.
    pub fn into_contract<C: Schema>(self) -> Result<C> {
        let expected = short_type_name(std::any::type_name::<C>());
        if self.contract.key() != &ContractKey::Type(TypeId::of::<C>()) {
            return Err(Error::TypeMismatch {
                expected,
                found: self.contract_name().to_string(),
            });
        }
        let found = self.contract_name().to_string();
        let contract = Arc::clone(&self.contract);
        contract
            .instantiate(self)
            .downcast::<C>()
            .map(|c| *c)
            .map_err(|_| Error::TypeMismatch { expected, found })
    }

    fn builtin_signature(&self, name: &str) -> String {
        format!("{}::{name}()", self.contract_name())
    }

    /// The anchor path.
    #[must_use]
    pub fn anchor(&self) -> &Path {
        &self.anchor
    }

    /// The anchor path, owned.
    #[must_use]
    pub fn get(&self) -> PathBuf {
        self.anchor.clone()
    }

    /// The anchor's direct parent, `None` at the filesystem root.
    #[must_use]
    pub fn parent(&self) -> Option<PathBuf> {
        crate::path::ascend(&self.anchor, 1)
    }

    /// True if the anchor exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.store.exists(&self.anchor)
    }

    /// Create the anchor directory; its parent must exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CreateIfAbsentFailed`] if the directory cannot be
    /// created or a non-directory is in the way.
    pub fn create_if_absent(&self) -> Result<()> {
        resolver::apply_action(
            self.store.as_ref(),
            CreateAction::CreateIfAbsent,
            &self.builtin_signature("create_if_absent"),
            &self.anchor,
        )
    }

    /// Create the anchor directory and every missing ancestor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CreateRecursiveFailed`] on failure.
    pub fn create_recursive(&self) -> Result<()> {
        resolver::apply_action(
            self.store.as_ref(),
            CreateAction::CreateRecursive,
            &self.builtin_signature("create_recursive"),
            &self.anchor,
        )
    }

    /// Delete the anchor and everything below it. Missing anchors are fine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeleteFailed`] if anything cannot be removed.
    pub fn delete_recursive(&self) -> Result<()> {
        self.store
            .remove_all(&self.anchor)
            .map_err(|source| Error::DeleteFailed {
                path: self.anchor.clone(),
                source,
            })?;
        log::debug!("deleted {}", self.anchor.display());
        Ok(())
    }

    /// The anchor joined with `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for empty or absolute names.
    pub fn resolve_child(&self, name: &str) -> Result<PathBuf> {
        check_subpath(name).map_err(|reason| Error::InvalidArgument {
            signature: format!("{}::resolve_child(name) -> Path", self.contract_name()),
            reason,
        })?;
        Ok(self.anchor.join(name))
    }

    /// Every entry of the subtree, the anchor included.
    #[must_use]
    pub fn walk(&self) -> Walker {
        Walker::new(
            Arc::clone(&self.store),
            self.anchor.clone(),
            WalkBounds::unbounded(),
        )
    }

    /// The anchor and every entry down to `depth`.
    #[must_use]
    pub fn walk_depth(&self, depth: usize) -> Walker {
        Walker::new(
            Arc::clone(&self.store),
            self.anchor.clone(),
            WalkBounds::max(depth),
        )
    }

    /// Every regular file of the subtree.
    pub fn files_only(&self) -> impl Iterator<Item = Result<PathBuf>> + Send + 'static {
        let store = Arc::clone(&self.store);
        self.walk().filter(move |entry| match entry {
            Ok(path) => store.is_file(path),
            Err(_) => true,
        })
    }

    /// Invoke an operation without an argument.
    ///
    /// # Errors
    ///
    /// Returns whatever the operation fails with; see [`Error`].
    pub fn call(&self, operation: &str) -> Result<Value> {
        self.invoke(operation, None)
    }

    /// Invoke an operation with a subpath argument.
    ///
    /// # Errors
    ///
    /// Returns whatever the operation fails with; see [`Error`].
    pub fn call_with(&self, operation: &str, arg: &str) -> Result<Value> {
        self.invoke(operation, Some(arg))
    }

    fn invoke(&self, operation: &str, arg: Option<&str>) -> Result<Value> {
        match self.call_builtin(operation, arg) {
            Some(result) => result,
            None => resolver::resolve(self, operation, arg),
        }
    }

    fn call_builtin(&self, name: &str, arg: Option<&str>) -> Option<Result<Value>> {
        let paths =
            |walker: Walker| Value::Sequence(Sequence::new(walker.map(|e| e.map(Value::Path))));
        let result = match (name, arg) {
            ("anchor" | "get", None) => Ok(Value::Path(self.get())),
            ("parent", None) => self.parent().map(Value::Path).ok_or_else(|| {
                Error::AscendBeyondRoot {
                    signature: self.builtin_signature("parent"),
                    depth: 1,
                    anchor: self.anchor.clone(),
                }
            }),
            ("exists", None) => Ok(Value::Bool(self.exists())),
            ("create_if_absent", None) => self.create_if_absent().map(|()| Value::Unit),
            ("create_recursive", None) => self.create_recursive().map(|()| Value::Unit),
            ("delete_recursive", None) => self.delete_recursive().map(|()| Value::Unit),
            ("resolve_child", Some(child)) => self.resolve_child(child).map(Value::Path),
            ("resolve_child", None) => Err(Error::InvalidArgument {
                signature: format!("{}::resolve_child(name) -> Path", self.contract_name()),
                reason: "a child name is required".to_string(),
            }),
            ("walk", None) => Ok(paths(self.walk())),
            ("walk", Some(depth)) => depth
                .parse::<usize>()
                .map(|depth| paths(self.walk_depth(depth)))
                .map_err(|e| Error::InvalidArgument {
                    signature: format!("{}::walk(depth)", self.contract_name()),
                    reason: format!("depth '{depth}' is not a number: {e}"),
                }),
            ("files_only", None) => Ok(Value::Sequence(Sequence::new(
                self.files_only().map(|e| e.map(Value::Path)),
            ))),
            (_, Some(arg)) if is_builtin(name) => Err(Error::InvalidArgument {
                signature: self.builtin_signature(name),
                reason: format!("takes no argument, got '{arg}'"),
            }),
            _ => return None,
        };
        Some(result)
    }

    /// Invoke `operation` and expect a bare path.
    ///
    /// # Errors
    ///
    /// Returns the operation's error or [`Error::TypeMismatch`].
    pub fn path(&self, operation: &str) -> Result<PathBuf> {
        self.call(operation)?.into_path()
    }

    /// Invoke `operation` with `arg` and expect a bare path.
    ///
    /// # Errors
    ///
    /// Returns the operation's error or [`Error::TypeMismatch`].
    pub fn path_with(&self, operation: &str, arg: &str) -> Result<PathBuf> {
        self.call_with(operation, arg)?.into_path()
    }

    /// Invoke `operation` and expect a `T` (wrapped value or contract).
    ///
    /// # Errors
    ///
    /// Returns the operation's error or [`Error::TypeMismatch`].
    pub fn get_as<T: Schema>(&self, operation: &str) -> Result<T> {
        self.call(operation)?.into_typed()
    }

    /// Invoke `operation` with `arg` and expect a `T`.
    ///
    /// # Errors
    ///
    /// Returns the operation's error or [`Error::TypeMismatch`].
    pub fn get_as_with<T: Schema>(&self, operation: &str, arg: &str) -> Result<T> {
        self.call_with(operation, arg)?.into_typed()
    }

    /// Invoke a collection operation and collect its `T`s.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, the first walk error, or
    /// [`Error::TypeMismatch`].
    pub fn list<T: Schema>(&self, operation: &str) -> Result<Vec<T>> {
        self.call(operation)?.into_vec()
    }

    /// Invoke a collection operation and collect its paths.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, the first walk error, or
    /// [`Error::TypeMismatch`].
    pub fn paths(&self, operation: &str) -> Result<Vec<PathBuf>> {
        self.call(operation)?.into_paths()
    }

    /// Invoke a collection operation and iterate its `T`s lazily.
    ///
    /// # Errors
    ///
    /// Returns the operation's error or [`Error::TypeMismatch`] if it is
    /// not a collection.
    pub fn iter<T: Schema>(&self, operation: &str) -> Result<impl Iterator<Item = Result<T>>> {
        Ok(self
            .call(operation)?
            .into_values()?
            .map(|value| value.and_then(Value::into_typed::<T>)))
    }

    /// Invoke a collection operation and iterate its paths lazily.
    ///
    /// # Errors
    ///
    /// Returns the operation's error or [`Error::TypeMismatch`] if it is
    /// not a collection.
    pub fn iter_paths(&self, operation: &str) -> Result<impl Iterator<Item = Result<PathBuf>>> {
        Ok(self
            .call(operation)?
            .into_values()?
            .map(|value| value.and_then(Value::into_path)))
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.contract.key() == other.contract.key() && self.anchor == other.anchor
    }
}

impl Eq for Binding {}

impl Hash for Binding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.contract.key().hash(state);
        self.anchor.hash(state);
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Binding({} @ {})", self.contract.name(), self.anchor.display())
    }
}
