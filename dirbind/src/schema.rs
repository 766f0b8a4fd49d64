//! Declaring contracts and value types.
//!
//! Types describe themselves through [`Schema`]. A contract calls
//! [`SchemaBuilder::contract`] and declares operations; a value type
//! declares a path constructor or named factories. The resulting
//! [`TypeDescriptor`] is built once per type and memoized for the life of
//! the process.
//!
//! # Examples
//!
//! ```
//! use dirbind::{Binding, Result, Schema, SchemaBuilder};
//! use std::path::PathBuf;
//!
//! pub struct Src(Binding);
//!
//! impl Schema for Src {
//!     fn schema(s: &mut SchemaBuilder<Self>) {
//!         s.contract(Src);
//!         s.operation("java").name("main/java").create_recursive();
//!     }
//! }
//!
//! pub struct Module(Binding);
//!
//! impl Schema for Module {
//!     fn schema(s: &mut SchemaBuilder<Self>) {
//!         s.contract(Module);
//!         s.operation("pom_xml").name("pom.xml");
//!         s.operation("src").returns::<Src>();
//!     }
//! }
//!
//! impl Module {
//!     pub fn pom_xml(&self) -> Result<PathBuf> {
//!         self.0.path("pom_xml")
//!     }
//!
//!     pub fn src(&self) -> Result<Src> {
//!         self.0.get_as("src")
//!     }
//! }
//!
//! let module: Module = dirbind::bind("/repo/app").unwrap();
//! assert_eq!(module.pom_xml().unwrap(), PathBuf::from("/repo/app/pom.xml"));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::{Arc, Weak};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::binding::Binding;
use crate::descriptor::{
    short_type_name, Collection, ContractDescriptor, ContractKey, ContractLookup, CreateAction,
    DefaultBody, ElementRef, Instantiate, OperationDescriptor, TargetRule, TypeDescriptor,
};
use crate::error::{BoxError, Result};
use crate::filter::{FilterChain, PathFilter};
use crate::value::Value;
use crate::walk::WalkBounds;
use crate::wrapper::{BuildFn, WrapperCandidates};

/// A type that can appear in contracts: as a contract, as a wrapped value,
/// or both.
pub trait Schema: Sized + Send + 'static {
    /// Declare the type's constructor, factories, contract and operations.
    fn schema(schema: &mut SchemaBuilder<Self>);
}

static TYPES: Lazy<RwLock<HashMap<TypeId, Arc<TypeDescriptor>>>> = Lazy::new(Default::default);

/// The memoized descriptor of `T`.
///
/// Built outside the lock on first use; if two threads race, the first
/// stored copy wins and both observe it.
pub fn type_descriptor<T: Schema>() -> Arc<TypeDescriptor> {
    let id = TypeId::of::<T>();
    if let Some(found) = TYPES.read().get(&id) {
        return Arc::clone(found);
    }
    let built = Arc::new(SchemaBuilder::<T>::collect());
    log::debug!("described type {}", built.name());
    Arc::clone(TYPES.write().entry(id).or_insert(built))
}

/// Collects the declarations of one type.
pub struct SchemaBuilder<T> {
    name: String,
    wrappers: WrapperCandidates,
    contract: Option<Instantiate>,
    operations: Vec<OperationBuilder>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Schema> SchemaBuilder<T> {
    fn collect() -> TypeDescriptor {
        let mut builder = Self {
            name: short_type_name(std::any::type_name::<T>()),
            wrappers: WrapperCandidates::default(),
            contract: None,
            operations: Vec::new(),
            _marker: PhantomData,
        };
        T::schema(&mut builder);

        let wrapper = builder.wrappers.select(&builder.name);
        let contract = builder.contract.map(|instantiate| {
            let operations = builder
                .operations
                .into_iter()
                .map(|op| op.build(&builder.name))
                .collect();
            Arc::new(ContractDescriptor::new(
                ContractKey::Type(TypeId::of::<T>()),
                builder.name.clone(),
                operations,
                instantiate,
            ))
        });
        TypeDescriptor::new(builder.name, wrapper, contract)
    }

    /// The short name used in signatures and errors.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.name
    }

    /// Declare a fallible path constructor. Preferred over any factory.
    pub fn constructor<F, E>(&mut self, ctor: F) -> &mut Self
    where
        F: Fn(PathBuf) -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.wrappers.set_constructor(boxed_build(ctor));
        self
    }

    /// Declare an infallible path constructor, e.g. `s.from_path(Pom)`.
    pub fn from_path<F>(&mut self, ctor: F) -> &mut Self
    where
        F: Fn(PathBuf) -> T + Send + Sync + 'static,
    {
        self.constructor(move |path| Ok::<T, BoxError>(ctor(path)))
    }

    /// Declare a named path factory. When several are declared the
    /// lexically smallest name is used.
    pub fn factory<F, E>(&mut self, name: &str, factory: F) -> &mut Self
    where
        F: Fn(PathBuf) -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.wrappers.add_factory(name, boxed_build(factory));
        self
    }

    /// Mark the type as a contract built from a binding.
    pub fn contract<F>(&mut self, from_binding: F) -> &mut Self
    where
        F: Fn(Binding) -> T + Send + Sync + 'static,
    {
        self.contract = Some(Arc::new(move |binding: Binding| {
            Box::new(from_binding(binding)) as Box<dyn Any + Send>
        }));
        self
    }

    /// Declare an operation and return its builder.
    pub fn operation(&mut self, name: &str) -> &mut OperationBuilder {
        self.operations.push(OperationBuilder::new(name));
        let last = self.operations.len() - 1;
        &mut self.operations[last]
    }
}

fn boxed_build<T, F, E>(build: F) -> BuildFn
where
    T: Send + 'static,
    F: Fn(PathBuf) -> std::result::Result<T, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    Arc::new(move |path| {
        build(path)
            .map(|value| Box::new(value) as Box<dyn Any + Send>)
            .map_err(Into::into)
    })
}

/// Metadata of one operation under construction.
///
/// Defaults: the target is `anchor/<name>`, no creation, no argument, a
/// single bare path, no filters and direct-children walks for collections.
pub struct OperationBuilder {
    name: String,
    name_override: Option<String>,
    ascend: Option<usize>,
    takes_argument: bool,
    action: CreateAction,
    walk: Option<WalkBounds>,
    filters: FilterChain,
    element: ElementRef,
    collection: Collection,
    must_exist: bool,
    body: Option<DefaultBody>,
}

impl OperationBuilder {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            name_override: None,
            ascend: None,
            takes_argument: false,
            action: CreateAction::None,
            walk: None,
            filters: FilterChain::new(),
            element: ElementRef::Path,
            collection: Collection::Single,
            must_exist: false,
            body: None,
        }
    }

    /// Join `segment` instead of the operation name. May contain `/`.
    pub fn name(&mut self, segment: impl Into<String>) -> &mut Self {
        self.name_override = Some(segment.into());
        self
    }

    /// Target the anchor with `depth` trailing segments removed.
    pub fn ascend(&mut self, depth: usize) -> &mut Self {
        self.ascend = Some(depth);
        self
    }

    /// Target the anchor's direct parent.
    pub fn parent(&mut self) -> &mut Self {
        self.ascend(1)
    }

    /// Require a subpath argument that replaces the name.
    pub fn argument(&mut self) -> &mut Self {
        self.takes_argument = true;
        self
    }

    /// Create the target directory (one level) before returning.
    pub fn create_if_absent(&mut self) -> &mut Self {
        self.action(CreateAction::CreateIfAbsent)
    }

    /// Create the target directory and its ancestors before returning.
    pub fn create_recursive(&mut self) -> &mut Self {
        self.action(CreateAction::CreateRecursive)
    }

    /// Set the creation action.
    pub fn action(&mut self, action: CreateAction) -> &mut Self {
        self.action = action;
        self
    }

    /// Walk with `bounds` instead of direct children.
    pub fn walk(&mut self, bounds: WalkBounds) -> &mut Self {
        self.walk = Some(bounds);
        self
    }

    /// Append a filter instance.
    pub fn filter(&mut self, filter: impl PathFilter + 'static) -> &mut Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Append a default-constructed filter.
    pub fn filter_default<F: PathFilter + Default + 'static>(&mut self) -> &mut Self {
        self.filter(F::default())
    }

    /// Fail with `MissingTarget` when a path or wrapped target is absent.
    pub fn must_exist(&mut self) -> &mut Self {
        self.must_exist = true;
        self
    }

    /// Set the element type to `U`, a contract or a wrapped value.
    pub fn returns<U: Schema>(&mut self) -> &mut Self {
        self.element = ElementRef::Typed {
            name: short_type_name(std::any::type_name::<U>()),
            describe: type_descriptor::<U>,
        };
        self
    }

    pub(crate) fn returns_named(
        &mut self,
        name: &str,
        catalog: Weak<dyn ContractLookup>,
    ) -> &mut Self {
        self.element = ElementRef::Named {
            name: name.to_string(),
            catalog,
        };
        self
    }

    /// Return every matching entry as an array.
    pub fn array(&mut self) -> &mut Self {
        self.collection(Collection::Array)
    }

    /// Return matching entries as a lazy sequence.
    pub fn sequence(&mut self) -> &mut Self {
        self.collection(Collection::Sequence)
    }

    /// Set the collection kind.
    pub fn collection(&mut self, collection: Collection) -> &mut Self {
        self.collection = collection;
        self
    }

    /// Run `body` instead of resolving the operation.
    pub fn implemented_by<F>(&mut self, body: F) -> &mut Self
    where
        F: Fn(&Binding, Option<&str>) -> Result<Value> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    pub(crate) fn build(self, contract: &str) -> OperationDescriptor {
        let target = match self.ascend {
            Some(depth) => TargetRule::Ascend(depth),
            None => TargetRule::Child {
                name_override: self.name_override,
            },
        };
        OperationDescriptor {
            contract: contract.to_string(),
            name: self.name,
            target,
            takes_argument: self.takes_argument,
            action: self.action,
            walk: self.walk,
            filters: self.filters,
            element: self.element,
            collection: self.collection,
            must_exist: self.must_exist,
            body: self.body,
        }
    }
}
