//! Schema file loading.
//!
//! Raw `.proto` text is compiled elsewhere (`pbjs -t json`); this module reads
//! the resulting descriptor tree, in JSON or YAML syntax, and turns it into
//! the [`PackageMap`] stored by the catalog. Files are loaded one at a time,
//! and a file that fails to load leaves the catalog untouched.

use crate::adapters::catalog::SchemaCatalog;
use crate::adapters::resolver::join_scope;
use crate::domain::{EnumDef, FieldDef, FieldLabel, MessageDef, PackageDef, PackageMap};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid descriptor in {}: {reason}", .path.display())]
    InvalidDescriptor { path: PathBuf, reason: String },

    #[error("Unsupported schema file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Produces the package tree of one schema file.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    async fn load(&self, path: &Path) -> Result<PackageMap, LoadError>;
}

/// Reads protobuf.js JSON descriptors from `.json`, `.yaml` or `.yml` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct DescriptorFileSource;

#[async_trait]
impl SchemaSource for DescriptorFileSource {
    async fn load(&self, path: &Path) -> Result<PackageMap, LoadError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if !matches!(ext, "json" | "yaml" | "yml") {
            return Err(LoadError::UnsupportedFormat(path.to_path_buf()));
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let root: Value = if ext == "json" {
            serde_json::from_str(&content).map_err(|e| LoadError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| LoadError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        parse_descriptor(&root).map_err(|reason| LoadError::InvalidDescriptor {
            path: path.to_path_buf(),
            reason,
        })
    }
}

/// Converts a protobuf.js descriptor root into packages.
///
/// Namespaces become packages joined with `.`; types nested in a message are
/// placed in the package `<package>.<Message>`. Services are skipped.
pub fn parse_descriptor(root: &Value) -> Result<PackageMap, String> {
    let root = root
        .as_object()
        .ok_or_else(|| "descriptor root must be an object".to_string())?;
    let mut packages = PackageMap::new();
    if let Some(nested) = root.get("nested") {
        walk_namespace("", nested, &mut packages)?;
    }
    Ok(packages)
}

fn walk_namespace(namespace: &str, nested: &Value, packages: &mut PackageMap) -> Result<(), String> {
    let nested = nested
        .as_object()
        .ok_or_else(|| format!("'nested' of '{}' must be an object", display_scope(namespace)))?;

    for (name, node) in nested {
        let node = node
            .as_object()
            .ok_or_else(|| format!("definition '{}' must be an object", join_scope(namespace, name)))?;

        if let Some(fields) = node.get("fields") {
            let message = parse_message(name, fields)?;
            package_entry(packages, namespace).insert_message(message);
        } else if let Some(values) = node.get("values") {
            let def = parse_enum(name, values)?;
            package_entry(packages, namespace).insert_enum(def);
        } else if node.contains_key("methods") {
            continue;
        }

        if let Some(children) = node.get("nested") {
            walk_namespace(&join_scope(namespace, name), children, packages)?;
        }
    }
    Ok(())
}

fn package_entry<'a>(packages: &'a mut PackageMap, name: &str) -> &'a mut PackageDef {
    packages
        .entry(name.to_string())
        .or_insert_with(|| PackageDef::new(name))
}

fn parse_message(name: &str, fields: &Value) -> Result<MessageDef, String> {
    let fields = fields
        .as_object()
        .ok_or_else(|| format!("fields of message '{}' must be an object", name))?;

    let mut message = MessageDef::new(name);
    for (field_name, field) in fields {
        message.fields.push(parse_field(name, field_name, field)?);
    }
    Ok(message)
}

fn parse_field(message: &str, name: &str, field: &Value) -> Result<FieldDef, String> {
    let field: &Map<String, Value> = field
        .as_object()
        .ok_or_else(|| format!("field '{}.{}' must be an object", message, name))?;

    let type_name = field
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| format!("field '{}.{}' has no type", message, name))?;

    let label = match field.get("rule").and_then(Value::as_str) {
        Some("repeated") => FieldLabel::Repeated,
        _ => FieldLabel::Singular,
    };

    let key_type = field.get("keyType").and_then(Value::as_str);

    Ok(FieldDef::from_parts(name, type_name, label, key_type))
}

fn parse_enum(name: &str, values: &Value) -> Result<EnumDef, String> {
    let values = values
        .as_object()
        .ok_or_else(|| format!("values of enum '{}' must be an object", name))?;

    let mut def = EnumDef::new(name);
    for (value_name, id) in values {
        let id = id
            .as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .ok_or_else(|| format!("enum value '{}.{}' must be a 32-bit integer", name, value_name))?;
        def.values_by_id.insert(id, value_name.clone());
    }
    Ok(def)
}

fn display_scope(namespace: &str) -> &str {
    if namespace.is_empty() {
        "<root>"
    } else {
        namespace
    }
}

/// Per-file outcome of [`load_schema_files`].
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, LoadError)>,
}

impl LoadReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Loads each path in order, awaiting one file before starting the next.
///
/// A failure is recorded in the report and the remaining files are still
/// loaded.
pub async fn load_schema_files(
    catalog: &mut SchemaCatalog,
    source: &dyn SchemaSource,
    paths: &[PathBuf],
) -> LoadReport {
    let mut report = LoadReport::default();
    for path in paths {
        match source.load(path).await {
            Ok(packages) => {
                let filepath = path.to_string_lossy().into_owned();
                let file = catalog.add_file(filepath, packages);
                info!(
                    file = %file.filepath,
                    packages = file.packages.len(),
                    "loaded schema file"
                );
                report.loaded.push(path.clone());
            }
            Err(e) => {
                warn!("Failed to load schema file {}: {}", path.display(), e);
                report.failed.push((path.clone(), e));
            }
        }
    }
    report
}

/// Expands glob patterns among the configured schema paths.
///
/// Plain paths are kept as they are (missing ones fail later, at load time);
/// a pattern that matches nothing is dropped with a warning.
pub fn expand_schema_paths(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if !pattern.contains(&['*', '?', '['][..]) {
            paths.push(PathBuf::from(pattern));
            continue;
        }
        let mut matched = false;
        for entry in glob::glob(pattern)? {
            match entry {
                Ok(path) => {
                    matched = true;
                    paths.push(path);
                }
                Err(e) => warn!("Failed to read glob entry: {}", e),
            }
        }
        if !matched {
            warn!("Schema pattern matched no files: {}", pattern);
        }
    }
    Ok(paths)
}
