//! Contracts declared by a layout.
//!
//! A [`Catalog`] owns the descriptors built from one layout. Operations
//! that return another layout contract refer back to the catalog weakly, so
//! contracts may reference each other (or themselves) freely.

use std::any::Any;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::binding::Binding;
use crate::descriptor::{ContractDescriptor, ContractKey, ContractLookup, Instantiate};
use crate::error::{Error, Result};
use crate::filter::{Extension, HasChild, IsDirectory, IsFile, NameGlob, NotHidden};
use crate::layout::schema::{FilterSpec, LayoutConfig, OperationSpec, PATH_ELEMENT};
use crate::layout::validator::LayoutValidator;
use crate::schema::OperationBuilder;
use crate::store::{FileStore, LocalStore};
use crate::walk::WalkBounds;

static NEXT_CATALOG: AtomicU64 = AtomicU64::new(0);

struct Table {
    contracts: BTreeMap<String, Arc<ContractDescriptor>>,
}

impl ContractLookup for Table {
    fn lookup(&self, name: &str) -> Option<Arc<ContractDescriptor>> {
        self.contracts.get(name).cloned()
    }
}

/// Contract descriptors built from a validated layout.
///
/// # Examples
///
/// ```
/// use dirbind::{Catalog, LayoutConfig};
///
/// let layout = LayoutConfig::from_yaml_str(r"
/// root: module
/// contracts:
///   module:
///     operations:
///       - { name: pom_xml, path: pom.xml }
/// ").unwrap();
///
/// let catalog = Catalog::from_config(&layout).unwrap();
/// let module = catalog.bind_root("/repo/app").unwrap();
/// assert!(module.path("pom_xml").unwrap().ends_with("app/pom.xml"));
/// ```
#[derive(Clone)]
pub struct Catalog {
    table: Arc<Table>,
    root: String,
    store: Arc<dyn FileStore>,
}

impl Catalog {
    /// Validate `layout` and build its contracts.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the layout is inconsistent.
    pub fn from_config(layout: &LayoutConfig) -> Result<Self> {
        LayoutValidator::validate(layout)?;
        let root = layout.root.clone().ok_or_else(|| Error::Validation {
            field: "root".into(),
            message: "A root contract is required".into(),
        })?;
        let id = NEXT_CATALOG.fetch_add(1, Ordering::Relaxed);

        let mut failure = None;
        let table = Arc::new_cyclic(|weak: &Weak<Table>| {
            let lookup: Weak<dyn ContractLookup> = weak.clone();
            let contracts = layout
                .contracts
                .iter()
                .map(|(name, spec)| contract_descriptor(id, name, &spec.operations, &lookup))
                .collect::<Result<_>>()
                .unwrap_or_else(|e| {
                    failure = Some(e);
                    BTreeMap::new()
                });
            Table { contracts }
        });
        if let Some(e) = failure {
            return Err(e);
        }
        log::debug!(
            "built layout catalog {id} with {} contract(s)",
            table.contracts.len()
        );

        Ok(Self {
            table,
            root,
            store: Arc::new(LocalStore::new()),
        })
    }

    /// Use `store` for bindings created from now on.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn FileStore>) -> Self {
        self.store = store;
        self
    }

    /// The root contract's name.
    #[must_use]
    pub fn root_name(&self) -> &str {
        &self.root
    }

    /// Contract names, sorted.
    pub fn contract_names(&self) -> impl Iterator<Item = &str> {
        self.table.contracts.keys().map(String::as_str)
    }

    /// Look up a contract.
    #[must_use]
    pub fn contract(&self, name: &str) -> Option<&Arc<ContractDescriptor>> {
        self.table.contracts.get(name)
    }

    /// Bind contract `name` to `anchor`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownContract`] if the layout does not define it.
    pub fn bind(&self, name: &str, anchor: impl Into<PathBuf>) -> Result<Binding> {
        let contract = self.contract(name).ok_or_else(|| Error::UnknownContract {
            name: name.to_string(),
        })?;
        let scope: Arc<dyn ContractLookup> = self.table.clone();
        Ok(
            Binding::new(Arc::clone(contract), anchor.into(), Arc::clone(&self.store))
                .with_scope(scope),
        )
    }

    /// Bind the root contract to `anchor`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownContract`] if the root is not defined.
    pub fn bind_root(&self, anchor: impl Into<PathBuf>) -> Result<Binding> {
        self.bind(&self.root, anchor)
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("root", &self.root)
            .field("contracts", &self.table.contracts.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn contract_descriptor(
    catalog: u64,
    name: &str,
    specs: &[OperationSpec],
    lookup: &Weak<dyn ContractLookup>,
) -> Result<(String, Arc<ContractDescriptor>)> {
    let operations = specs
        .iter()
        .enumerate()
        .map(|(i, op)| {
            operation_builder(op, lookup)
                .map(|builder| builder.build(name))
                .map_err(|message| Error::Validation {
                    field: format!("contracts.{name}.operations[{i}]"),
                    message,
                })
        })
        .collect::<Result<_>>()?;
    let instantiate: Instantiate =
        Arc::new(|binding: Binding| Box::new(binding) as Box<dyn Any + Send>);
    let descriptor = ContractDescriptor::new(
        ContractKey::Named {
            catalog,
            name: name.to_string(),
        },
        name.to_string(),
        operations,
        instantiate,
    );
    Ok((name.to_string(), Arc::new(descriptor)))
}

fn operation_builder(
    spec: &OperationSpec,
    lookup: &Weak<dyn ContractLookup>,
) -> std::result::Result<OperationBuilder, String> {
    let mut op = OperationBuilder::new(&spec.name);
    if let Some(path) = &spec.path {
        op.name(path.clone());
    }
    if let Some(depth) = spec.ascend {
        op.ascend(depth);
    }
    if spec.argument {
        op.argument();
    }
    if spec.must_exist {
        op.must_exist();
    }
    if let Some(create) = spec.create {
        op.action(create.into());
    }
    if let Some(walk) = spec.walk {
        op.walk(WalkBounds::from_raw(walk.min_depth, walk.max_depth)?);
    }
    for filter in &spec.filters {
        match filter {
            FilterSpec::IsDir => op.filter(IsDirectory),
            FilterSpec::IsFile => op.filter(IsFile),
            FilterSpec::NotHidden => op.filter(NotHidden),
            FilterSpec::HasChild(name) => op.filter(HasChild::new(name.clone())),
            FilterSpec::Extension(ext) => op.filter(Extension::new(ext)),
            FilterSpec::Glob(pattern) => op.filter(
                NameGlob::new(pattern).map_err(|e| format!("invalid glob '{pattern}': {e}"))?,
            ),
        };
    }
    let element = spec.element();
    if element != PATH_ELEMENT {
        op.returns_named(element, lookup.clone());
    }
    op.collection(spec.collection());
    Ok(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::schema::WalkSpec;
    use std::fs;
    use tempfile::tempdir;

    const LAYOUT: &str = r"
root: project
contracts:
  project:
    operations:
      - name: modules
        returns: module
        collection: array
        filters: [is_dir, { has_child: pom.xml }]
      - name: docs
        collection: sequence
        walk: { min_depth: 1 }
        filters: [{ extension: md }]
  module:
    operations:
      - { name: pom_xml, path: pom.xml, must_exist: true }
      - { name: src, returns: src }
      - { name: project, ascend: 1, returns: project }
  src:
    operations:
      - { name: java, path: main/java, create: recursive }
";

    fn catalog() -> Catalog {
        Catalog::from_config(&LayoutConfig::from_yaml_str(LAYOUT).unwrap()).unwrap()
    }

    #[test]
    fn test_contract_names() {
        let catalog = catalog();
        assert_eq!(
            catalog.contract_names().collect::<Vec<_>>(),
            vec!["module", "project", "src"]
        );
        assert_eq!(catalog.root_name(), "project");
    }

    #[test]
    fn test_nested_navigation() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        fs::write(dir.path().join("app/pom.xml"), "").unwrap();
        fs::create_dir_all(dir.path().join("notes")).unwrap();

        let project = catalog().bind_root(dir.path()).unwrap();
        let modules: Vec<Binding> = project
            .call("modules")
            .unwrap()
            .into_values()
            .unwrap()
            .map(|v| v.and_then(crate::Value::into_binding))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(modules.len(), 1);
        let module = &modules[0];
        assert_eq!(module.contract_name(), "module");
        assert_eq!(module.path("pom_xml").unwrap(), dir.path().join("app/pom.xml"));

        let java = module
            .call("src")
            .unwrap()
            .into_binding()
            .unwrap()
            .path("java")
            .unwrap();
        assert!(java.is_dir());

        let back = module.call("project").unwrap().into_binding().unwrap();
        assert_eq!(back, project);
    }

    #[test]
    fn test_walk_and_extension_filter() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/guide.md"), "").unwrap();
        fs::write(dir.path().join("readme.md"), "").unwrap();
        fs::write(dir.path().join("main.rs"), "").unwrap();

        let project = catalog().bind_root(dir.path()).unwrap();
        assert_eq!(
            project.paths("docs").unwrap(),
            vec![dir.path().join("a/b/guide.md"), dir.path().join("readme.md")]
        );
    }

    #[test]
    fn test_bindings_outlive_catalog() {
        let dir = tempdir().unwrap();
        let module = {
            let catalog = catalog();
            catalog.bind("module", dir.path().join("app")).unwrap()
        };
        let project = module.call("project").unwrap().into_binding().unwrap();
        assert_eq!(project.contract_name(), "project");
        assert_eq!(project.anchor(), dir.path());
    }

    #[test]
    fn test_catalogs_have_distinct_identity() {
        let a = catalog().bind_root("/repo").unwrap();
        let b = catalog().bind_root("/repo").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unknown_contract() {
        assert!(matches!(
            catalog().bind("nope", "/repo").unwrap_err(),
            Error::UnknownContract { .. }
        ));
    }

    #[test]
    fn test_operation_builder_rejects_bad_walk_and_glob() {
        let lookup: Weak<dyn ContractLookup> = Weak::<Table>::new();

        let inverted = OperationSpec {
            name: "deep".to_string(),
            walk: Some(WalkSpec {
                min_depth: 3,
                max_depth: 1,
            }),
            ..OperationSpec::default()
        };
        let err = operation_builder(&inverted, &lookup).err().unwrap();
        assert!(err.contains("below min_depth"));

        let bad_glob = OperationSpec {
            name: "sources".to_string(),
            filters: vec![FilterSpec::Glob("[".to_string())],
            ..OperationSpec::default()
        };
        let err = operation_builder(&bad_glob, &lookup).err().unwrap();
        assert!(err.contains("invalid glob '['"));
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let layout = LayoutConfig::from_yaml_str("root: x\ncontracts: {}\n").unwrap();
        assert!(Catalog::from_config(&layout).is_err());
    }
}
