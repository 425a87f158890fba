pub mod catalog;
pub mod mock_synth;
pub mod resolver;
pub mod schema_loader;
