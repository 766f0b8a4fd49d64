//! Contracts declared in YAML layout files.
//!
//! Layouts let tools bind directory shapes without Rust types. A layout is
//! discovered (`dirbind.yaml` at or above the working directory), loaded
//! from an explicit file, or built programmatically; environment variables
//! may override it; it is validated and finally turned into a [`Catalog`]
//! whose bindings behave exactly like typed ones.
//!
//! # Configuration Precedence
//!
//! 1. Programmatic layout (via `LayoutBuilder::with_config`)
//! 2. Explicit file (`LayoutBuilder::with_file`, then `DIRBIND_LAYOUT`)
//! 3. Nearest `dirbind.yaml`
//!
//! The root contract is overridden by `DIRBIND_ROOT_CONTRACT`, then by
//! `LayoutBuilder::with_root`.
//!
//! # Examples
//!
//! ```no_run
//! use dirbind::layout::LayoutBuilder;
//! use std::path::Path;
//!
//! let catalog = LayoutBuilder::new()
//!     .with_working_dir(Path::new("/path/to/project"))
//!     .build()
//!     .unwrap()
//!     .catalog()
//!     .unwrap();
//! let root = catalog.bind_root("/path/to/project").unwrap();
//! for module in root.call("modules").unwrap().into_values().unwrap() {
//!     println!("{:?}", module.unwrap());
//! }
//! ```

pub mod builder;
pub mod catalog;
pub mod environment;
pub mod loader;
pub mod schema;
pub mod validator;

// Re-export key types at module root
pub use builder::{LayoutBuilder, LoadedLayout};
pub use catalog::Catalog;
pub use environment::{LayoutEnvironment, LAYOUT_ENV, ROOT_CONTRACT_ENV};
pub use loader::{LayoutLoader, LayoutSource, LAYOUT_FILE_NAME};
pub use schema::{
    CollectionSpec, ContractSpec, CreateSpec, FilterSpec, LayoutConfig, OperationSpec, WalkSpec,
    PATH_ELEMENT,
};
pub use validator::LayoutValidator;
