//! Survey Schema
//!
//! Turns compiled questions into API type definitions.
//!
//! # Core Concepts
//!
//! - [`SchemaFragment`]: one named type definition with its origin
//! - Generators: option types, option-id enums, edition-id enums, `Surveys`
//! - [`SchemaAssembler`]: order-preserving, collision-refusing collector
//! - [`compile_schema`]: full walk from surveys to a [`SchemaDocument`]
//!
//! # Example
//!
//! ```rust
//! use survey_schema::{SchemaAssembler, SchemaFragment, TypeKind};
//!
//! let mut assembler = SchemaAssembler::new();
//! assembler
//!     .push(SchemaFragment::new("A", TypeKind::Enum, "enum A {\n    x\n}", "doc"))
//!     .unwrap();
//! assert!(assembler
//!     .push(SchemaFragment::new("A", TypeKind::Enum, "enum A {\n    y\n}", "doc"))
//!     .is_err());
//! assert_eq!(assembler.finish().to_sdl(), "enum A {\n    x\n}\n");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod assembler;
mod compile;
mod error;
mod fragment;
mod generate;

pub use assembler::SchemaAssembler;
pub use compile::{compile_schema, CompiledQuestion, CompiledSchema, SchemaIssue, OPTION_EDITIONS_FIELD};
pub use error::{SchemaError, SchemaResult};
pub use fragment::{SchemaDocument, SchemaFragment, TypeKind};
pub use generate::{
    edition_id_type_name, generate_edition_id_enum, generate_enum_type, generate_option_type,
    generate_surveys_type, survey_type_name, SURVEYS_TYPE_NAME,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
