//! Mock payload synthesis.
//!
//! Every scalar kind maps to a fixed literal so payloads are reproducible
//! field by field. The one exception is a `string` field whose name looks
//! like an identifier (`id…` or `…id`, any case), which gets a fresh UUID v4.

use crate::adapters::catalog::SchemaCatalog;
use crate::adapters::resolver::{Resolution, TypeResolver};
use crate::domain::{Cardinality, FieldDef, MessageDef, MockValue, Record, ScalarKind, SchemaFile, TypeRef};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("Message not found: {package}.{name}")]
    MessageNotFound {
        package: String,
        name: String,
        file: Option<String>,
    },
}

/// Literal used for a scalar field that is not identifier-like.
pub fn scalar_mock(kind: ScalarKind) -> MockValue {
    match kind {
        ScalarKind::String => MockValue::String("Hello".to_string()),
        ScalarKind::Number | ScalarKind::Int32 => MockValue::Int(10),
        ScalarKind::Uint32 | ScalarKind::Sint32 | ScalarKind::Uint64 => MockValue::Int(100),
        ScalarKind::Bool => MockValue::Bool(true),
        ScalarKind::Int64 => MockValue::Int(20),
        ScalarKind::Sint64 => MockValue::Int(1200),
        ScalarKind::Fixed32 => MockValue::Int(1400),
        ScalarKind::Fixed64 => MockValue::Int(1500),
        ScalarKind::Sfixed32 => MockValue::Int(1600),
        ScalarKind::Sfixed64 => MockValue::Int(1700),
        ScalarKind::Double => MockValue::Float(1.4),
        ScalarKind::Float => MockValue::Float(1.1),
        ScalarKind::Bytes => MockValue::Bytes(b"Hello".to_vec()),
    }
}

pub fn is_id_like(field_name: &str) -> bool {
    let lower = field_name.to_lowercase();
    lower.starts_with("id") || lower.ends_with("id")
}

/// Key of a message type currently being synthesized.
type InProgressKey = (String, String, String);

/// Builds example payloads for messages of loaded schema files.
pub struct MockSynthesizer<'a> {
    catalog: &'a SchemaCatalog,
}

impl<'a> MockSynthesizer<'a> {
    pub fn new(catalog: &'a SchemaCatalog) -> Self {
        Self { catalog }
    }

    /// Finds `package.name` in the catalog (in `filepath` only, when given)
    /// and synthesizes it.
    pub fn synthesize_selected(
        &self,
        filepath: Option<&str>,
        package: &str,
        name: &str,
    ) -> Result<Record, SynthesisError> {
        let selection = self
            .catalog
            .find_message(filepath, package, name)
            .ok_or_else(|| SynthesisError::MessageNotFound {
                package: package.to_string(),
                name: name.to_string(),
                file: filepath.map(str::to_string),
            })?;
        tracing::info!(
            file = %selection.file.filepath,
            package = selection.package,
            message_type = %selection.message.name,
            "synthesizing mock payload"
        );
        Ok(synthesize(selection.message, selection.file, selection.package))
    }
}

/// Synthesizes a mock record for `message`, declared in `package` of `file`.
///
/// Never fails: unknown field types become `0` and a message that is
/// already being synthesized further up the stack becomes an empty record.
pub fn synthesize(message: &MessageDef, file: &SchemaFile, package: &str) -> Record {
    let mut in_progress = HashSet::new();
    synthesize_message(message, file, package, &mut in_progress)
}

fn synthesize_message(
    message: &MessageDef,
    file: &SchemaFile,
    package: &str,
    in_progress: &mut HashSet<InProgressKey>,
) -> Record {
    let key = (file.filepath.clone(), package.to_string(), message.name.clone());
    if !in_progress.insert(key.clone()) {
        tracing::debug!(message_type = %message.name, package, "recursive reference, using placeholder");
        return Record::default();
    }

    let mut builder = Record::builder();
    for field in &message.fields {
        let value = synthesize_field(field, message, file, package, in_progress);
        builder.insert(field.name.clone(), value);
    }

    in_progress.remove(&key);
    builder.finish()
}

fn synthesize_field(
    field: &FieldDef,
    message: &MessageDef,
    file: &SchemaFile,
    package: &str,
    in_progress: &mut HashSet<InProgressKey>,
) -> MockValue {
    let base = base_value(&field.type_ref, &field.name, message, file, package, in_progress);
    match &field.cardinality {
        Cardinality::Map(key_type) => {
            let key = base_value(key_type, &field.name, message, file, package, in_progress);
            MockValue::Map(vec![(key, base)])
        }
        Cardinality::Repeated => MockValue::List(vec![base]),
        Cardinality::Singular => base,
    }
}

fn base_value(
    type_ref: &TypeRef,
    field_name: &str,
    message: &MessageDef,
    file: &SchemaFile,
    package: &str,
    in_progress: &mut HashSet<InProgressKey>,
) -> MockValue {
    match TypeResolver::resolve_in_message(type_ref, package, &message.name, file) {
        Resolution::Scalar(ScalarKind::String) if is_id_like(field_name) => {
            MockValue::String(uuid::Uuid::new_v4().to_string())
        }
        Resolution::Scalar(kind) => scalar_mock(kind),
        Resolution::Message { package, def } => {
            MockValue::Record(synthesize_message(def, file, package, in_progress))
        }
        // Enums carry no fields, so they synthesize like an empty message.
        Resolution::Enum { .. } => MockValue::Record(Record::default()),
        Resolution::Unresolved => MockValue::UNRESOLVED,
    }
}
