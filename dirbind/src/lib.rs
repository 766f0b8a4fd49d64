#![deny(unsafe_code)]
#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # dirbind
//!
//! Strongly-typed directory layout contracts bound to real filesystem
//! locations.
//!
//! Application code declares the shape of a directory tree as a contract,
//! a set of named operations, and binds it to an anchor path. Each
//! operation call is interpreted against the filesystem: child path
//! resolution, optional directory creation, filtered and bounded walks,
//! wrapping paths into application types and re-binding nested contracts.
//!
//! ## Core Types
//!
//! - [`Schema`], [`SchemaBuilder`] and [`OperationBuilder`]: declaring contracts
//! - [`bind`] and [`Binding`]: binding contracts to anchors
//! - [`Value`]: dynamic operation results
//! - [`WalkBounds`] and [`Walker`]: bounded subtree enumeration
//! - [`PathFilter`] and [`FilterChain`]: restricting enumerated entries
//! - [`Catalog`] and [`LayoutBuilder`]: contracts declared in YAML
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use dirbind::filter::HasChild;
//! use dirbind::{Binding, Result, Schema, SchemaBuilder};
//!
//! struct Project(Binding);
//!
//! impl Schema for Project {
//!     fn schema(s: &mut SchemaBuilder<Self>) {
//!         s.contract(Project);
//!         s.operation("modules")
//!             .filter(HasChild::new("pom.xml"))
//!             .returns::<Module>()
//!             .array();
//!     }
//! }
//!
//! struct Module(Binding);
//!
//! impl Schema for Module {
//!     fn schema(s: &mut SchemaBuilder<Self>) {
//!         s.contract(Module);
//!         s.operation("pom_xml").name("pom.xml").must_exist();
//!     }
//! }
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::create_dir_all(dir.path().join("app")).unwrap();
//! std::fs::write(dir.path().join("app/pom.xml"), "<project/>").unwrap();
//! std::fs::create_dir_all(dir.path().join("docs")).unwrap();
//!
//! let project: Project = dirbind::bind(dir.path()).unwrap();
//! let modules: Vec<Module> = project.0.list("modules").unwrap();
//! assert_eq!(modules.len(), 1);
//! assert!(modules[0].0.path("pom_xml").unwrap().ends_with("app/pom.xml"));
//! ```

pub mod binding;
pub mod descriptor;
pub mod error;
pub mod filter;
pub mod layout;
pub mod logging;
pub mod path;
mod resolver;
pub mod schema;
pub mod store;
pub mod value;
pub mod walk;
pub mod wrapper;

// Re-export key types at crate root for convenience
pub use binding::{bind, bind_with_store, is_builtin, Binding, BUILTIN_OPERATIONS};
pub use descriptor::{
    Collection, ContractDescriptor, ContractKey, CreateAction, OperationDescriptor, TargetRule,
    TypeDescriptor,
};
pub use error::{BoxError, Error, Result};
pub use filter::{Candidate, FilterChain, PathFilter};
pub use layout::{Catalog, LayoutBuilder, LayoutConfig};
pub use logging::{init_logger, LogLevel, Logger};
pub use schema::{type_descriptor, OperationBuilder, Schema, SchemaBuilder};
pub use store::{EntryKind, FileStore, LocalStore};
pub use value::{Sequence, Value, Wrapped};
pub use walk::{WalkBounds, Walker};
pub use wrapper::{WrapperDescriptor, WrapperKind};
