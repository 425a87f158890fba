//! # protomock
//!
//! Browse protobuf schema definitions and synthesize example payloads for
//! their messages.
//!
//! Schema files arrive as protobuf.js descriptor trees and are kept in a
//! [`SchemaCatalog`](adapters::catalog::SchemaCatalog). Picking a message
//! from the catalog and handing it to the synthesizer yields a
//! [`Record`](domain::Record) whose fields follow a fixed literal per scalar
//! kind, ready to be verified and encoded by a protobuf library.
//!
//! ```rust,no_run
//! use protomock::adapters::catalog::SchemaCatalog;
//! use protomock::adapters::mock_synth::MockSynthesizer;
//! use protomock::adapters::schema_loader::{load_schema_files, DescriptorFileSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut catalog = SchemaCatalog::new();
//!     let paths = vec!["schemas/shop.json".into()];
//!     load_schema_files(&mut catalog, &DescriptorFileSource, &paths).await;
//!
//!     let record = MockSynthesizer::new(&catalog).synthesize_selected(None, "shop", "Order")?;
//!     println!("{}", serde_json::to_string_pretty(&record)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! - **Domain**: schema model and mock value tree
//! - **Adapters**: catalog, type resolution, synthesis, descriptor loading
//! - **Config**: settings, validation and schema file watching

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
