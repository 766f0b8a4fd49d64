//! End-to-end scenarios for typed contracts bound to real directory trees.

mod common;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use common::contracts::{Dual, Holder, Module, PomFile, Project, Section, Src};
use common::{relative, TreeFixture};
use dirbind::{bind, Binding, Error, LocalStore, WalkBounds};

fn build_tree() -> tempfile::TempDir {
    TreeFixture::new()
        .file("app/pom.xml", "<project><artifactId>app</artifactId></project>")
        .dir("app/src/main")
        .file("lib/pom.xml", "<project/>")
        .file("broken/pom.xml", "not xml")
        .dir("docs/guides")
        .file("README.md", "# build")
        .build()
}

#[test]
fn test_module_navigation() {
    let tree = build_tree();
    let module: Module = bind(tree.path().join("app")).unwrap();

    assert_eq!(module.pom_xml().unwrap(), tree.path().join("app/pom.xml"));
    let src: Src = module.src().unwrap();
    assert_eq!(src.0.anchor(), tree.path().join("app/src"));
    let project = module.project().unwrap();
    assert_eq!(project.0.anchor(), tree.path());
}

#[test]
fn test_anchor_and_parent() {
    let tree = build_tree();
    let anchor = tree.path().join("app");
    let module: Module = bind(anchor.clone()).unwrap();
    assert_eq!(module.0.anchor(), anchor);
    assert_eq!(module.0.parent(), Some(tree.path().to_path_buf()));
}

#[test]
fn test_section_creates_directories() {
    let tree = build_tree();
    let module: Module = bind(tree.path().join("lib")).unwrap();
    let main: Section = module.src().unwrap().main().unwrap();

    // lib/src/main does not exist yet, so one-level creation fails.
    let err = main.resources().unwrap_err();
    assert!(matches!(err, Error::CreateIfAbsentFailed { .. }));

    let java = main.java().unwrap();
    assert_eq!(java, tree.path().join("lib/src/main/java"));
    assert!(java.is_dir());

    let resources = main.resources().unwrap();
    assert!(resources.is_dir());
    // Idempotent.
    assert_eq!(main.resources().unwrap(), resources);
    assert_eq!(main.java().unwrap(), java);
}

#[test]
fn test_explicit_subpath_bypasses_name() {
    let tree = build_tree();
    let section: Section = bind(tree.path().join("app/src/main")).unwrap();
    assert_eq!(
        section.0.path_with("file", "java/App.java").unwrap(),
        tree.path().join("app/src/main/java/App.java")
    );
}

#[test]
fn test_filtered_modules() {
    let tree = build_tree();
    let project: Project = bind(tree.path()).unwrap();
    let modules = project.modules().unwrap();
    let anchors: Vec<PathBuf> = modules.iter().map(|m| m.0.get()).collect();
    assert_eq!(
        relative(tree.path(), &anchors),
        vec!["app", "broken", "lib"]
    );
    assert!(project.0.call("has_modules").unwrap().into_bool().unwrap());
}

#[test]
fn test_module_sequence_matches_array() {
    let tree = build_tree();
    let project: Project = bind(tree.path()).unwrap();
    let streamed: Vec<Binding> = project
        .0
        .iter::<Module>("module_stream")
        .unwrap()
        .map(|m| m.map(|m| m.0))
        .collect::<dirbind::Result<_>>()
        .unwrap();
    let listed: Vec<Binding> = project.modules().unwrap().into_iter().map(|m| m.0).collect();
    assert_eq!(streamed, listed);
}

#[test]
fn test_wrapped_pom() {
    let tree = build_tree();
    let app: Module = bind(tree.path().join("app")).unwrap();
    let pom: PomFile = app.pom().unwrap();
    assert!(pom.contents.contains("artifactId"));
    assert_eq!(pom.path, tree.path().join("app/pom.xml"));

    let broken: Module = bind(tree.path().join("broken")).unwrap();
    match broken.pom().unwrap_err() {
        Error::WrapperConstructionFailed { target, member, .. } => {
            assert_eq!(target, "PomFile");
            assert_eq!(member, "parse");
        }
        other => panic!("unexpected error: {other}"),
    }

    let missing: Module = bind(tree.path().join("docs")).unwrap();
    assert!(missing.pom().unwrap_err().is_missing_target());
}

#[test]
fn test_four_levels_between_two_and_two() {
    let tree = TreeFixture::new()
        .dir("b/y/deep/er")
        .dir("a/x/deep/er")
        .dir("a/w")
        .file("a/file.txt", "")
        .build();
    let project: Project = bind(tree.path()).unwrap();
    let level_two = project.0.paths("level_two").unwrap();
    assert_eq!(relative(tree.path(), &level_two), vec!["a/w", "a/x", "b/y"]);
}

#[test]
fn test_walk_bounds_properties() {
    let tree = TreeFixture::new().dir("a/b/c").file("a/f.txt", "").build();
    let root = tree.path();
    let run = |bounds| {
        let entries = dirbind::walk::walk(Arc::new(LocalStore::new()), root, bounds).unwrap();
        relative(root, &entries)
    };

    assert_eq!(run(WalkBounds::between(0, 0)), vec![""]);
    assert_eq!(run(WalkBounds::max(1)), vec!["", "a"]);
    assert_eq!(run(WalkBounds::default()), vec!["a"]);
    assert_eq!(run(WalkBounds::min(2)), vec!["a/b", "a/b/c", "a/f.txt"]);
    assert_eq!(run(WalkBounds::between(2, 2)), vec!["a/b", "a/f.txt"]);
}

#[test]
fn test_constructor_takes_precedence_over_contract() {
    let tree = build_tree();
    let holder: Holder = bind(tree.path()).unwrap();
    match holder.0.get_as::<Dual>("dual").unwrap() {
        Dual::Wrapped(path) => assert_eq!(path, tree.path().join("dual")),
        Dual::Bound(_) => panic!("expected the constructor to win"),
    }
    // Binding the type directly still uses its contract.
    let bound: Dual = bind(tree.path()).unwrap();
    assert!(matches!(bound, Dual::Bound(_)));
}

#[test]
fn test_binding_equality_in_sets() {
    let tree = build_tree();
    let a: Module = bind(tree.path().join("app")).unwrap();
    let b: Module = bind(tree.path().join("app")).unwrap();
    let mut set = HashSet::new();
    set.insert(a.0);
    assert!(!set.insert(b.0));
}

#[test]
fn test_bindings_are_shareable_across_threads() {
    let tree = build_tree();
    let project: Project = bind(tree.path()).unwrap();
    let binding = project.0.clone();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let binding = binding.clone();
            thread::spawn(move || binding.paths("level_two").map(|p| p.len()))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 2);
    }
}
