//! Tree-sitter based C# parsing for DTO generation.
//!
//! Two halves:
//! - [`entities`] extracts [`dtogen_core::model::EntityMetadata`] from a single
//!   entity class, optionally merging properties inherited from base classes
//!   found through a [`resolver::RelatedUnitResolver`].
//! - [`inspect`] analyses a previously generated DTO file so regeneration
//!   keeps hand-written members and custom-code sections intact.

pub mod entities;
pub mod error;
pub mod inspect;
pub mod resolver;
pub mod syntax;
pub mod treesitter;

pub use error::ExtractError;
pub use treesitter::SourceUnit;
