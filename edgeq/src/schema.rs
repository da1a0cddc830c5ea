//! Schema descriptors for API edges.
//!
//! An edge is one addressable resource type: its valid field names and the
//! relations it declares. Schemas are loaded once (usually from TOML) and are
//! read-only afterwards.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Cardinality of a relation between two edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToMany,
}

/// A named link from one edge to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Name used in `embed=` lists.
    pub name: String,

    /// Opaque handle handed to the query executor when the relation is expanded.
    pub relation_id: String,

    /// Relation cardinality. Only one-to-one relations can be embedded.
    pub kind: RelationKind,
}

impl Relation {
    pub fn new(name: impl Into<String>, relation_id: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            name: name.into(),
            relation_id: relation_id.into(),
            kind,
        }
    }

    pub fn is_one_to_one(&self) -> bool {
        self.kind == RelationKind::OneToOne
    }
}

/// Schema descriptor for a single edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSchema {
    /// Edge name, also the first path segment addressing it.
    pub name: String,

    /// Valid field names.
    #[serde(default)]
    pub fields: Vec<String>,

    /// Declared relations, in declaration order.
    #[serde(default, rename = "relation", skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<Relation>,
}

impl EdgeSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: set the field list.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: append a relation.
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Look up a relation that may be embedded (one-to-one only).
    pub fn one_to_one_relation(&self, name: &str) -> Option<&Relation> {
        self.relations
            .iter()
            .find(|r| r.is_one_to_one() && r.name == name)
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.name.contains('/') {
            return Err(Error::Schema(format!("invalid edge name '{}'", self.name)));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.is_empty() {
                return Err(Error::Schema(format!("edge '{}' has an empty field name", self.name)));
            }
            if !seen.insert(field.as_str()) {
                return Err(Error::Schema(format!(
                    "edge '{}' declares field '{}' twice",
                    self.name, field
                )));
            }
        }

        let mut seen = HashSet::new();
        for relation in &self.relations {
            if !seen.insert(relation.name.as_str()) {
                return Err(Error::Schema(format!(
                    "edge '{}' declares relation '{}' twice",
                    self.name, relation.name
                )));
            }
        }

        Ok(())
    }
}

/// All edges served under one API version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSchema {
    /// Version string as it appears in `/v<version>/` paths.
    pub version: String,

    #[serde(default, rename = "edge")]
    pub edges: Vec<EdgeSchema>,
}

impl ApiSchema {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            edges: Vec::new(),
        }
    }

    /// Builder: append an edge.
    pub fn with_edge(mut self, edge: EdgeSchema) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn edge(&self, name: &str) -> Option<&EdgeSchema> {
        self.edges.iter().find(|e| e.name == name)
    }
}

/// On-disk schema file: one or more API versions.
///
/// ```toml
/// [[api]]
/// version = "1"
///
/// [[api.edge]]
/// name = "users"
/// fields = ["id", "name"]
///
/// [[api.edge.relation]]
/// name = "profile"
/// relation_id = "users.profile"
/// kind = "one-to-one"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    #[serde(default, rename = "api")]
    pub apis: Vec<ApiSchema>,
}

impl SchemaFile {
    /// Parse and validate a schema from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let schema: SchemaFile = toml::from_str(contents)
            .map_err(|e| Error::Schema(format!("Failed to parse schema: {}", e)))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Load a schema file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::SchemaNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Write the schema as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Schema(format!("Failed to serialize schema: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Find the API serving a version.
    pub fn api(&self, version: &str) -> Option<&ApiSchema> {
        self.apis.iter().find(|a| a.version == version)
    }

    /// Check edge/field/relation naming rules.
    pub fn validate(&self) -> Result<()> {
        if self.apis.is_empty() {
            return Err(Error::Schema("no [[api]] declared".to_string()));
        }

        let mut versions = HashSet::new();
        for api in &self.apis {
            if api.version.is_empty() {
                return Err(Error::Schema("empty API version".to_string()));
            }
            if !versions.insert(api.version.as_str()) {
                return Err(Error::Schema(format!("API version '{}' declared twice", api.version)));
            }

            let mut names = HashSet::new();
            for edge in &api.edges {
                edge.validate()?;
                if !names.insert(edge.name.as_str()) {
                    return Err(Error::Schema(format!(
                        "edge '{}' declared twice in API version '{}'",
                        edge.name, api.version
                    )));
                }
            }
        }

        Ok(())
    }

    /// Small example schema written by `qs init`.
    pub fn sample() -> Self {
        let users = EdgeSchema::new("users")
            .with_fields(["id", "name", "email", "age", "status", "createdAt"])
            .with_relation(Relation::new("profile", "users.profile", RelationKind::OneToOne))
            .with_relation(Relation::new("address", "users.address", RelationKind::OneToOne))
            .with_relation(Relation::new("posts", "users.posts", RelationKind::OneToMany));
        let posts = EdgeSchema::new("posts")
            .with_fields(["id", "title", "body", "authorId", "createdAt"])
            .with_relation(Relation::new("author", "posts.author", RelationKind::OneToOne))
            .with_relation(Relation::new("tags", "posts.tags", RelationKind::ManyToMany));

        Self {
            apis: vec![ApiSchema::new("1").with_edge(users).with_edge(posts)],
        }
    }
}
