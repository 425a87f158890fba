use crate::domain::{MessageDef, PackageMap, SchemaFile};
use serde::Serialize;

/// In-memory store of every loaded schema file, in load order.
///
/// Writers need `&mut SchemaCatalog`; resolution and synthesis only borrow
/// it, so a reader can never observe a half-applied load.
#[derive(Debug, Default, Clone)]
pub struct SchemaCatalog {
    files: Vec<SchemaFile>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Appends a file. The same filepath may be loaded more than once; each
    /// load is kept as its own entry.
    pub fn add_file(&mut self, filepath: impl Into<String>, packages: PackageMap) -> &SchemaFile {
        let idx = self.files.len();
        self.files.push(SchemaFile::new(filepath, packages));
        &self.files[idx]
    }

    /// Loaded files in load order. Call again to restart.
    pub fn files(&self) -> impl Iterator<Item = &SchemaFile> + '_ {
        self.files.iter()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// First loaded file with this path.
    pub fn file(&self, filepath: &str) -> Option<&SchemaFile> {
        self.files.iter().find(|f| f.filepath == filepath)
    }

    /// Looks a message up by package and name, either in the given file or,
    /// without one, in every file in load order.
    pub fn find_message(
        &self,
        filepath: Option<&str>,
        package: &str,
        name: &str,
    ) -> Option<MessageSelection<'_>> {
        self.files
            .iter()
            .filter(|f| filepath.map_or(true, |p| f.filepath == p))
            .find_map(|file| {
                let (package, pkg) = file.packages.get_key_value(package)?;
                let message = pkg.messages.get(name)?;
                Some(MessageSelection {
                    file,
                    package: package.as_str(),
                    message,
                })
            })
    }

    /// Flat listing of every message and enum across loaded files.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let mut entries = Vec::new();
        for file in &self.files {
            for (package_name, package) in &file.packages {
                for name in package.messages.keys() {
                    entries.push(CatalogEntry {
                        filepath: file.filepath.clone(),
                        package: package_name.clone(),
                        name: name.clone(),
                        kind: EntryKind::Message,
                    });
                }
                for name in package.enums.keys() {
                    entries.push(CatalogEntry {
                        filepath: file.filepath.clone(),
                        package: package_name.clone(),
                        name: name.clone(),
                        kind: EntryKind::Enum,
                    });
                }
            }
        }
        entries
    }
}

impl<'a> IntoIterator for &'a SchemaCatalog {
    type Item = &'a SchemaFile;
    type IntoIter = std::slice::Iter<'a, SchemaFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// A message picked out of the catalog together with where it lives.
#[derive(Debug, Clone, Copy)]
pub struct MessageSelection<'a> {
    pub file: &'a SchemaFile,
    pub package: &'a str,
    pub message: &'a MessageDef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Message,
    Enum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub filepath: String,
    pub package: String,
    pub name: String,
    pub kind: EntryKind,
}

impl CatalogEntry {
    /// `package.Name`, or just `Name` in the root package.
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }
}
