//! Core types: the schema model loaded into the catalog and the mock value
//! tree synthesized from it.

pub mod schema;
pub mod value;

pub use schema::{
    Cardinality, EnumDef, FieldDef, FieldLabel, MessageDef, PackageDef, PackageMap,
    QualifiedName, ScalarKind, SchemaFile, TypeRef,
};
pub use value::{MockValue, Record, RecordBuilder};
