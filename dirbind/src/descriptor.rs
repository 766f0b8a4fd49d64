//! The per-contract operation table.
//!
//! Every contract, typed or loaded from a layout, is described by a
//! [`ContractDescriptor`]: its name, an identity key used for binding
//! equality, the operations it declares and a way to turn a [`Binding`]
//! back into the contract's own type. Descriptors are immutable once built.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::binding::Binding;
use crate::error::{Error, Result};
use crate::filter::FilterChain;
use crate::value::Value;
use crate::walk::WalkBounds;
use crate::wrapper::WrapperDescriptor;

/// Strip module paths from a `std::any::type_name` string.
///
/// Generic arguments are shortened as well, so
/// `alloc::vec::Vec<my::Module>` becomes `Vec<Module>`.
pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        match c {
            '<' | '>' | ',' | ' ' | '[' | ']' | '(' | ')' | '&' | ';' => {
                out.push_str(last_segment(&segment));
                segment.clear();
                out.push(c);
            }
            _ => segment.push(c),
        }
    }
    out.push_str(last_segment(&segment));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Directory creation performed on the target before the return shape is
/// produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CreateAction {
    /// Leave the filesystem alone.
    #[default]
    None,
    /// Create one level; the parent must exist.
    CreateIfAbsent,
    /// Create the target and every missing ancestor.
    CreateRecursive,
}

impl fmt::Display for CreateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::CreateIfAbsent => "create_if_absent",
            Self::CreateRecursive => "create_recursive",
        })
    }
}

/// How many elements an operation returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Exactly one element.
    #[default]
    Single,
    /// An eagerly collected list.
    Array,
    /// A lazy, forward-only sequence.
    Sequence,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Array => "array",
            Self::Sequence => "sequence",
        })
    }
}

/// How an operation computes its target path from the anchor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetRule {
    /// Join a child segment (the override, or the operation name).
    Child {
        /// Replaces the operation name as the joined segment.
        name_override: Option<String>,
    },
    /// Remove this many trailing segments.
    Ascend(usize),
}

/// Lookup of named contracts, implemented by layout catalogs.
pub(crate) trait ContractLookup: Send + Sync {
    fn lookup(&self, name: &str) -> Option<Arc<ContractDescriptor>>;
}

/// The declared element type of an operation.
#[derive(Clone)]
pub(crate) enum ElementRef {
    /// A bare path.
    Path,
    /// A Rust type, described lazily so self-referential contracts work.
    Typed {
        name: String,
        describe: fn() -> Arc<TypeDescriptor>,
    },
    /// A contract declared in a layout catalog.
    Named {
        name: String,
        catalog: Weak<dyn ContractLookup>,
    },
}

/// What an element type resolved to at call time.
#[derive(Clone)]
pub(crate) enum ElementShape {
    Path,
    Wrapped(WrapperDescriptor),
    Nested(Arc<ContractDescriptor>),
}

impl ElementRef {
    pub(crate) fn name(&self) -> &str {
        match self {
            Self::Path => "Path",
            Self::Typed { name, .. } | Self::Named { name, .. } => name,
        }
    }

    /// Classify the element: wrapping wins over nesting.
    pub(crate) fn resolve(&self) -> Result<ElementShape> {
        match self {
            Self::Path => Ok(ElementShape::Path),
            Self::Typed { name, describe } => {
                let descriptor = describe();
                if let Some(wrapper) = descriptor.wrapper() {
                    Ok(ElementShape::Wrapped(wrapper.clone()))
                } else if let Some(contract) = descriptor.contract() {
                    Ok(ElementShape::Nested(Arc::clone(contract)))
                } else {
                    Err(Error::WrapperResolutionFailed {
                        target: name.clone(),
                    })
                }
            }
            Self::Named { name, catalog } => catalog
                .upgrade()
                .and_then(|catalog| catalog.lookup(name))
                .map(ElementShape::Nested)
                .ok_or_else(|| Error::UnknownContract { name: name.clone() }),
        }
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Body of a default-implemented operation.
pub type DefaultBody = Arc<dyn Fn(&Binding, Option<&str>) -> Result<Value> + Send + Sync>;

/// Everything the resolver needs to interpret one operation.
#[derive(Clone)]
pub struct OperationDescriptor {
    pub(crate) contract: String,
    pub(crate) name: String,
    pub(crate) target: TargetRule,
    pub(crate) takes_argument: bool,
    pub(crate) action: CreateAction,
    pub(crate) walk: Option<WalkBounds>,
    pub(crate) filters: FilterChain,
    pub(crate) element: ElementRef,
    pub(crate) collection: Collection,
    pub(crate) must_exist: bool,
    pub(crate) body: Option<DefaultBody>,
}

impl OperationDescriptor {
    /// The operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declaring contract's name.
    #[must_use]
    pub fn contract(&self) -> &str {
        &self.contract
    }

    /// The target path rule.
    #[must_use]
    pub fn target_rule(&self) -> &TargetRule {
        &self.target
    }

    /// True if the operation takes an explicit subpath argument.
    #[must_use]
    pub fn takes_argument(&self) -> bool {
        self.takes_argument
    }

    /// The creation action.
    #[must_use]
    pub fn action(&self) -> CreateAction {
        self.action
    }

    /// Declared walk bounds, if any.
    #[must_use]
    pub fn walk_bounds(&self) -> Option<WalkBounds> {
        self.walk
    }

    /// The filter chain.
    #[must_use]
    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    /// Name of the element type (`Path` for bare paths).
    #[must_use]
    pub fn element_name(&self) -> &str {
        self.element.name()
    }

    /// The collection kind.
    #[must_use]
    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// True if a missing target is an error.
    #[must_use]
    pub fn must_exist(&self) -> bool {
        self.must_exist
    }

    /// True if the operation runs a default body.
    #[must_use]
    pub fn has_default_body(&self) -> bool {
        self.body.is_some()
    }

    /// The declared return shape, e.g. `[Module]`.
    #[must_use]
    pub fn return_shape(&self) -> String {
        let element = self.element.name();
        match self.collection {
            Collection::Single => element.to_string(),
            Collection::Array => format!("[{element}]"),
            Collection::Sequence => format!("Iterator<{element}>"),
        }
    }

    /// Human-readable signature used in errors, e.g. `Module::src() -> Src`.
    #[must_use]
    pub fn signature(&self) -> String {
        format!(
            "{}::{}({}) -> {}",
            self.contract,
            self.name,
            if self.takes_argument { "subpath" } else { "" },
            self.return_shape()
        )
    }
}

impl fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("signature", &self.signature())
            .field("target", &self.target)
            .field("action", &self.action)
            .field("walk", &self.walk)
            .field("filters", &self.filters)
            .field("must_exist", &self.must_exist)
            .field("default_body", &self.body.is_some())
            .finish()
    }
}

/// Identity of a contract, used for binding equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContractKey {
    /// A Rust contract type.
    Type(TypeId),
    /// A layout contract, scoped to the catalog that loaded it.
    Named {
        /// Catalog identity.
        catalog: u64,
        /// Contract name within the catalog.
        name: String,
    },
}

pub(crate) type Instantiate = Arc<dyn Fn(Binding) -> Box<dyn Any + Send> + Send + Sync>;

/// A contract: its identity, operations and instantiation hook.
pub struct ContractDescriptor {
    key: ContractKey,
    name: String,
    operations: BTreeMap<String, Arc<OperationDescriptor>>,
    instantiate: Instantiate,
}

impl ContractDescriptor {
    pub(crate) fn new(
        key: ContractKey,
        name: String,
        operations: Vec<OperationDescriptor>,
        instantiate: Instantiate,
    ) -> Self {
        let mut table = BTreeMap::new();
        for operation in operations {
            if crate::binding::is_builtin(&operation.name) {
                log::warn!(
                    "{name}::{} is shadowed by the built-in capability of the same name",
                    operation.name
                );
            }
            if let Some(previous) = table.insert(operation.name.clone(), Arc::new(operation)) {
                log::warn!("{name}::{} declared twice; keeping the last", previous.name);
            }
        }
        Self {
            key,
            name,
            operations: table,
            instantiate,
        }
    }

    /// Identity key.
    #[must_use]
    pub fn key(&self) -> &ContractKey {
        &self.key
    }

    /// Contract name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an operation by name.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&Arc<OperationDescriptor>> {
        self.operations.get(name)
    }

    /// All operations, sorted by name.
    pub fn operations(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.operations.values().map(AsRef::as_ref)
    }

    pub(crate) fn instantiate(&self, binding: Binding) -> Box<dyn Any + Send> {
        (self.instantiate)(binding)
    }
}

impl fmt::Debug for ContractDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractDescriptor")
            .field("name", &self.name)
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// What a Rust type declared about itself: a wrapper, a contract, both or
/// neither.
#[derive(Debug)]
pub struct TypeDescriptor {
    name: String,
    wrapper: Option<WrapperDescriptor>,
    contract: Option<Arc<ContractDescriptor>>,
}

impl TypeDescriptor {
    pub(crate) fn new(
        name: String,
        wrapper: Option<WrapperDescriptor>,
        contract: Option<Arc<ContractDescriptor>>,
    ) -> Self {
        Self {
            name,
            wrapper,
            contract,
        }
    }

    /// Short type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The selected wrapper, if the type declared one.
    #[must_use]
    pub fn wrapper(&self) -> Option<&WrapperDescriptor> {
        self.wrapper.as_ref()
    }

    /// The contract, if the type declared one.
    #[must_use]
    pub fn contract(&self) -> Option<&Arc<ContractDescriptor>> {
        self.contract.as_ref()
    }
}
