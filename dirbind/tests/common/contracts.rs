//! Contracts describing a small multi-module build tree.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use dirbind::filter::{Candidate, HasChild, PathFilter};
use dirbind::{Binding, Result, Schema, SchemaBuilder, Value, WalkBounds};

/// A `pom.xml` that must start with `<project`.
#[derive(Debug)]
pub struct PomFile {
    pub path: PathBuf,
    pub contents: String,
}

impl PomFile {
    fn parse(path: PathBuf) -> std::io::Result<Self> {
        let contents = fs::read_to_string(&path)?;
        if !contents.trim_start().starts_with("<project") {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "missing <project> root",
            ));
        }
        Ok(Self { path, contents })
    }
}

impl Schema for PomFile {
    fn schema(s: &mut SchemaBuilder<Self>) {
        s.factory("parse", Self::parse);
    }
}

#[derive(Default)]
pub struct HasPomXml;

impl PathFilter for HasPomXml {
    fn accept(&self, candidate: &Candidate<'_>) -> bool {
        candidate.has_child("pom.xml")
    }
}

pub struct Project(pub Binding);

impl Schema for Project {
    fn schema(s: &mut SchemaBuilder<Self>) {
        s.contract(Project);
        s.operation("modules")
            .filter_default::<HasPomXml>()
            .returns::<Module>()
            .array();
        s.operation("module_stream")
            .filter(HasChild::new("pom.xml"))
            .returns::<Module>()
            .sequence();
        s.operation("level_two")
            .walk(WalkBounds::between(2, 2))
            .filter_default::<dirbind::filter::IsDirectory>()
            .array();
        s.operation("has_modules").implemented_by(|binding, _| {
            let mut modules = binding.call("modules")?.into_values()?;
            Ok(Value::Bool(modules.next().is_some()))
        });
    }
}

impl Project {
    pub fn modules(&self) -> Result<Vec<Module>> {
        self.0.list("modules")
    }
}

pub struct Module(pub Binding);

impl Schema for Module {
    fn schema(s: &mut SchemaBuilder<Self>) {
        s.contract(Module);
        s.operation("pom_xml").name("pom.xml");
        s.operation("pom").name("pom.xml").returns::<PomFile>().must_exist();
        s.operation("src").returns::<Src>();
        s.operation("project").parent().returns::<Project>();
    }
}

impl Module {
    pub fn pom_xml(&self) -> Result<PathBuf> {
        self.0.path("pom_xml")
    }

    pub fn pom(&self) -> Result<PomFile> {
        self.0.get_as("pom")
    }

    pub fn src(&self) -> Result<Src> {
        self.0.get_as("src")
    }

    pub fn project(&self) -> Result<Project> {
        self.0.get_as("project")
    }
}

pub struct Src(pub Binding);

impl Schema for Src {
    fn schema(s: &mut SchemaBuilder<Self>) {
        s.contract(Src);
        s.operation("main").returns::<Section>();
        s.operation("test").returns::<Section>();
    }
}

impl Src {
    pub fn main(&self) -> Result<Section> {
        self.0.get_as("main")
    }
}

pub struct Section(pub Binding);

impl Schema for Section {
    fn schema(s: &mut SchemaBuilder<Self>) {
        s.contract(Section);
        s.operation("java").create_recursive();
        s.operation("resources").create_if_absent();
        s.operation("file").argument();
    }
}

impl Section {
    pub fn java(&self) -> Result<PathBuf> {
        self.0.path("java")
    }

    pub fn resources(&self) -> Result<PathBuf> {
        self.0.path("resources")
    }
}

/// Declares both a path constructor and a contract.
#[derive(Debug)]
pub enum Dual {
    Wrapped(PathBuf),
    Bound(Binding),
}

impl Schema for Dual {
    fn schema(s: &mut SchemaBuilder<Self>) {
        s.from_path(Dual::Wrapped);
        s.contract(Dual::Bound);
    }
}

pub struct Holder(pub Binding);

impl Schema for Holder {
    fn schema(s: &mut SchemaBuilder<Self>) {
        s.contract(Holder);
        s.operation("dual").returns::<Dual>();
    }
}
