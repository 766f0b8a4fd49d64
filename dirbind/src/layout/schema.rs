//! Layout file schema definitions.
//!
//! A layout declares contracts by name, each with a list of operations,
//! mirroring what [`SchemaBuilder`](crate::SchemaBuilder) declares in code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::descriptor::{Collection, CreateAction};

/// Element type name reserved for bare paths.
pub const PATH_ELEMENT: &str = "path";

/// A complete layout file.
///
/// # Examples
///
/// ```
/// use dirbind::LayoutConfig;
///
/// let layout = LayoutConfig::from_yaml_str(r"
/// root: module
/// contracts:
///   module:
///     operations:
///       - name: pom_xml
///         path: pom.xml
/// ").unwrap();
/// assert_eq!(layout.root.as_deref(), Some("module"));
/// assert_eq!(layout.contracts["module"].operations.len(), 1);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Contract bound at the layout root.
    pub root: Option<String>,

    /// Contracts by name.
    #[serde(default)]
    pub contracts: BTreeMap<String, ContractSpec>,
}

impl LayoutConfig {
    /// Parse a layout from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) if the
    /// YAML is malformed or has unknown keys.
    pub fn from_yaml_str(yaml: &str) -> crate::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// One contract.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ContractSpec {
    /// Free-form description shown by `describe`.
    pub description: Option<String>,

    /// Declared operations.
    #[serde(default)]
    pub operations: Vec<OperationSpec>,
}

/// One operation.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OperationSpec {
    /// Operation name.
    pub name: String,

    /// Segment joined instead of the name.
    pub path: Option<String>,

    /// Element type: `path` or a contract name.
    pub returns: Option<String>,

    /// Collection kind.
    pub collection: Option<CollectionSpec>,

    /// Creation action.
    pub create: Option<CreateSpec>,

    /// Walk bounds for collections.
    pub walk: Option<WalkSpec>,

    /// Filters, AND-combined in order. Parameterized filters are written as
    /// single-entry maps (`{ has_child: pom.xml }`).
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub filters: Vec<FilterSpec>,

    /// Ascension depth.
    pub ascend: Option<usize>,

    /// Fail when a path target is absent.
    #[serde(default)]
    pub must_exist: bool,

    /// Take an explicit subpath argument.
    #[serde(default)]
    pub argument: bool,
}

impl OperationSpec {
    /// The element type name, `path` when unset.
    #[must_use]
    pub fn element(&self) -> &str {
        self.returns.as_deref().unwrap_or(PATH_ELEMENT)
    }

    /// The collection kind, `single` when unset.
    #[must_use]
    pub fn collection(&self) -> Collection {
        self.collection.map_or(Collection::Single, Into::into)
    }
}

/// Collection kind as written in layouts.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CollectionSpec {
    /// One element.
    Single,
    /// A list.
    Array,
    /// A lazy sequence.
    Sequence,
}

impl From<CollectionSpec> for Collection {
    fn from(spec: CollectionSpec) -> Self {
        match spec {
            CollectionSpec::Single => Self::Single,
            CollectionSpec::Array => Self::Array,
            CollectionSpec::Sequence => Self::Sequence,
        }
    }
}

/// Creation action as written in layouts.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CreateSpec {
    /// No creation.
    None,
    /// Create one level.
    IfAbsent,
    /// Create with ancestors.
    Recursive,
}

impl From<CreateSpec> for CreateAction {
    fn from(spec: CreateSpec) -> Self {
        match spec {
            CreateSpec::None => Self::None,
            CreateSpec::IfAbsent => Self::CreateIfAbsent,
            CreateSpec::Recursive => Self::CreateRecursive,
        }
    }
}

/// Walk bounds; `-1` for `max_depth` means unbounded.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WalkSpec {
    /// Minimum yielded depth (default 0).
    #[serde(default)]
    pub min_depth: i64,

    /// Maximum yielded depth (default -1).
    #[serde(default = "unbounded")]
    pub max_depth: i64,
}

fn unbounded() -> i64 {
    -1
}

/// A built-in filter.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilterSpec {
    /// Directories only.
    IsDir,
    /// Regular files only.
    IsFile,
    /// Skip dot-entries.
    NotHidden,
    /// Entries containing the named child.
    HasChild(String),
    /// Entries whose name matches the glob.
    Glob(String),
    /// Entries with the extension.
    Extension(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_operation() {
        let layout = LayoutConfig::from_yaml_str(
            r"
root: project
contracts:
  project:
    description: A multi-module build
    operations:
      - name: modules
        returns: module
        collection: array
        walk: { min_depth: 1, max_depth: 2 }
        filters:
          - is_dir
          - has_child: pom.xml
          - glob: 'mod-*'
  module:
    operations:
      - name: target
        create: if_absent
        must_exist: true
      - name: file
        argument: true
",
        )
        .unwrap();

        let project = &layout.contracts["project"];
        assert_eq!(project.description.as_deref(), Some("A multi-module build"));
        let modules = &project.operations[0];
        assert_eq!(modules.element(), "module");
        assert_eq!(modules.collection(), Collection::Array);
        assert_eq!(
            modules.walk,
            Some(WalkSpec {
                min_depth: 1,
                max_depth: 2
            })
        );
        assert_eq!(
            modules.filters,
            vec![
                FilterSpec::IsDir,
                FilterSpec::HasChild("pom.xml".to_string()),
                FilterSpec::Glob("mod-*".to_string()),
            ]
        );

        let target = &layout.contracts["module"].operations[0];
        assert_eq!(target.create, Some(CreateSpec::IfAbsent));
        assert!(target.must_exist);
        assert_eq!(target.element(), PATH_ELEMENT);
        assert!(layout.contracts["module"].operations[1].argument);
    }

    #[test]
    fn test_filters_in_map_form() {
        let layout = LayoutConfig::from_yaml_str(
            r"
root: tree
contracts:
  tree:
    operations:
      - name: entries
        collection: array
        filters:
          - is_dir
          - is_file
          - not_hidden
          - { has_child: pom.xml }
          - { glob: '*.java' }
          - extension: md
",
        )
        .unwrap();

        assert_eq!(
            layout.contracts["tree"].operations[0].filters,
            vec![
                FilterSpec::IsDir,
                FilterSpec::IsFile,
                FilterSpec::NotHidden,
                FilterSpec::HasChild("pom.xml".to_string()),
                FilterSpec::Glob("*.java".to_string()),
                FilterSpec::Extension("md".to_string()),
            ]
        );

        let yaml = serde_yaml::to_string(&layout).unwrap();
        assert!(yaml.contains("has_child: pom.xml"));
        assert_eq!(LayoutConfig::from_yaml_str(&yaml).unwrap(), layout);
    }

    #[test]
    fn test_walk_defaults() {
        let layout = LayoutConfig::from_yaml_str(
            r"
contracts:
  c:
    operations:
      - name: all
        collection: sequence
        walk: { min_depth: 2 }
",
        )
        .unwrap();
        let walk = layout.contracts["c"].operations[0].walk.unwrap();
        assert_eq!(walk.min_depth, 2);
        assert_eq!(walk.max_depth, -1);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result = LayoutConfig::from_yaml_str(
            r"
contracts:
  c:
    operations:
      - name: x
        pathh: typo
",
        );
        assert!(matches!(result, Err(crate::Error::Configuration(_))));
    }

    #[test]
    fn test_empty_layout() {
        let layout = LayoutConfig::from_yaml_str("{}").unwrap();
        assert!(layout.root.is_none());
        assert!(layout.contracts.is_empty());
    }
}
