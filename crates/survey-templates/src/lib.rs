//! Survey Templates
//!
//! Compiles question declarations into storage paths and schema metadata.
//!
//! # Core Concepts
//!
//! - [`TemplateKind`]: closed catalog of template names
//! - [`TemplateRegistry`]: static table binding each kind to a pure function
//! - [`resolve`]: dotted and flat storage paths for a (section, question, suffix)
//! - [`compile_section`]: applies templates to a section, rejecting path collisions
//! - [`compile_edition`]: every section of an edition, ids unique edition-wide
//!
//! # Example
//!
//! ```rust
//! use survey_model::{Edition, Fields, Question, Section, Survey};
//! use survey_templates::{TemplateContext, TemplateRegistry};
//!
//! let section = Section {
//!     id: "usage".into(),
//!     slug: None,
//!     template: None,
//!     questions: vec![Question::new("browsers", "multiple")],
//!     fields: Fields::new(),
//! };
//! let edition = Edition {
//!     id: "js2023".into(),
//!     year: Some(2023),
//!     sections: vec![],
//!     api_sections: vec![],
//!     fields: Fields::new(),
//! };
//! let survey = Survey {
//!     id: "state_of_js".into(),
//!     name: None,
//!     editions: vec![],
//!     fields: Fields::new(),
//! };
//!
//! let ctx = TemplateContext::new(&survey, &edition, &section, &section.questions[0], 0);
//! let output = TemplateRegistry::builtin().apply(&ctx).unwrap();
//! assert_eq!(output.allow_other, Some(true));
//! assert_eq!(output.raw_paths.unwrap().other.as_deref(), Some("usage__browsers__others"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod kind;
mod output;
mod registry;
mod resolver;
mod section;
mod templates;

pub use error::{TemplateError, TemplateResult};
pub use kind::TemplateKind;
pub use output::{NormPaths, QuestionTemplateOutput, RawPaths, TemplateContext};
pub use registry::{TemplateFn, TemplateRegistry};
pub use resolver::{
    base_path, resolve, suffixed_path, ResolvedPath, OTHERS_QUESTION_SUFFIX, TOOLS_OTHERS_SEGMENT,
    TOOL_SECTION_TEMPLATE,
};
pub use section::{compile_edition, compile_section, EditionOutput, SectionOutput};
pub use templates::{FEATURE_OPTIONS, TOOL_OPTIONS};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
