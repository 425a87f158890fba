//! Field type classification.
//!
//! Named types are looked up only inside the file the field was declared in.
//! A reference to a type that lives in another loaded file resolves to
//! [`Resolution::Unresolved`].

use crate::domain::{EnumDef, MessageDef, QualifiedName, ScalarKind, SchemaFile, TypeRef};

/// Outcome of classifying a declared field type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    Scalar(ScalarKind),
    Message {
        package: &'a str,
        def: &'a MessageDef,
    },
    Enum {
        package: &'a str,
        def: &'a EnumDef,
    },
    Unresolved,
}

impl Resolution<'_> {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Resolution::Unresolved)
    }
}

pub struct TypeResolver;

impl TypeResolver {
    /// Classifies a raw type name as declared in `current_package` of `file`.
    pub fn resolve<'a>(type_name: &str, current_package: &str, file: &'a SchemaFile) -> Resolution<'a> {
        Self::resolve_ref(&TypeRef::parse(type_name), current_package, file)
    }

    pub fn resolve_ref<'a>(
        type_ref: &TypeRef,
        current_package: &str,
        file: &'a SchemaFile,
    ) -> Resolution<'a> {
        match type_ref {
            TypeRef::Scalar(kind) => Resolution::Scalar(*kind),
            TypeRef::Named(name) => Self::resolve_named(name, current_package, file)
                .unwrap_or_else(|| Self::unresolved(name, current_package, file)),
        }
    }

    /// Classifies a field type declared inside `message`.
    ///
    /// Types nested in the message are flattened into the package
    /// `package.Message`, so the walk starts there and moves outwards through
    /// every enclosing scope of the file.
    pub fn resolve_in_message<'a>(
        type_ref: &TypeRef,
        package: &str,
        message: &str,
        file: &'a SchemaFile,
    ) -> Resolution<'a> {
        let name = match type_ref {
            TypeRef::Scalar(kind) => return Resolution::Scalar(*kind),
            TypeRef::Named(name) => name,
        };
        Self::resolve_named(name, &join_scope(package, message), file)
            .unwrap_or_else(|| Self::unresolved(name, package, file))
    }

    fn resolve_named<'a>(
        name: &QualifiedName,
        scope: &str,
        file: &'a SchemaFile,
    ) -> Option<Resolution<'a>> {
        let (package_path, leaf) = name.split();

        // `.Leaf` lives in the root package
        if name.is_absolute() {
            return Self::lookup(file, package_path.unwrap_or(""), leaf);
        }

        if let Some(path) = package_path {
            if let Some(found) = Self::lookup(file, path, leaf) {
                return Some(found);
            }
        }

        // Innermost scope first, ending at the root package.
        let mut current = Some(scope);
        while let Some(candidate) = current {
            let found = match package_path {
                Some(_) if candidate.is_empty() => None,
                Some(path) => Self::lookup(file, &join_scope(candidate, path), leaf),
                None => Self::lookup(file, candidate, leaf),
            };
            if found.is_some() {
                return found;
            }
            current = parent_scope(candidate);
        }
        None
    }

    fn lookup<'a>(file: &'a SchemaFile, package: &str, leaf: &str) -> Option<Resolution<'a>> {
        let (package, pkg) = file.packages.get_key_value(package)?;
        if let Some(def) = pkg.messages.get(leaf) {
            return Some(Resolution::Message {
                package: package.as_str(),
                def,
            });
        }
        pkg.enums.get(leaf).map(|def| Resolution::Enum {
            package: package.as_str(),
            def,
        })
    }

    fn unresolved<'a>(name: &QualifiedName, package: &str, file: &SchemaFile) -> Resolution<'a> {
        tracing::debug!(
            type_name = %name,
            package,
            file = %file.filepath,
            "type not found in originating file"
        );
        Resolution::Unresolved
    }
}

fn parent_scope(scope: &str) -> Option<&str> {
    if scope.is_empty() {
        return None;
    }
    Some(scope.rsplit_once('.').map_or("", |(parent, _)| parent))
}

pub(crate) fn join_scope(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}
