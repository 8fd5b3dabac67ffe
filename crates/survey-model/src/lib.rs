//! Survey Model
//!
//! Typed survey definitions and the storage path primitives shared by the
//! template engine, the schema generator and the loader.
//!
//! # Core Concepts
//!
//! - [`Survey`] → [`Edition`] → [`Section`] → [`Question`]: the definition tree
//! - [`StoragePath`]: dotted / flat addressing of response fields
//! - [`DbSuffix`]: which derived representation a path addresses
//! - [`graphqlize`]: canonical identifier → type-name transform
//!
//! # Example
//!
//! ```rust
//! use survey_model::{DbSuffix, StoragePath};
//!
//! let path = StoragePath::try_from_segments(["usage", "satisfaction"])
//!     .unwrap()
//!     .child(DbSuffix::Raw);
//! assert_eq!(path.flat(), "usage__satisfaction__raw");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod entity;
mod naming;
mod path;

pub use entity::{
    Edition, EditionConfig, Fields, OptionId, Question, QuestionOption, Section, Survey,
    SurveyConfig,
};
pub use naming::graphqlize;
pub use path::{DbSuffix, PathError, StoragePath, DOTTED_SEPARATOR, FLAT_SEPARATOR};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
