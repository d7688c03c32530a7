//! Service layer for business logic
//!
//! The link registry plus the metadata suggester it depends on. Shared by
//! the HTTP routes and the CLI.

mod link_registry;
pub mod suggester;

pub use link_registry::*;
pub use suggester::{
    FallbackSuggester, GeminiSuggester, LinkMetadata, MetadataSuggester, create_suggester,
};
