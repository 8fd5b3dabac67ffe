//! Schema fragments and the assembled document

use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// What a fragment defines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Per-question option object type
    Option,
    /// Per-question option-id enum
    Enum,
    /// Per-survey edition-id enum
    EditionId,
    /// Aggregate `Surveys` type
    Aggregate,
}

impl TypeKind {
    /// Kind name as serialized
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Option => "option",
            Self::Enum => "enum",
            Self::EditionId => "edition_id",
            Self::Aggregate => "aggregate",
        }
    }
}

impl Display for TypeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named type definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFragment {
    /// Type name, unique within a document
    pub type_name: String,
    /// What the fragment defines
    pub type_type: TypeKind,
    /// Definition text
    pub type_def: String,
    /// Where the fragment came from, for error messages
    #[serde(skip)]
    pub origin: String,
}

impl SchemaFragment {
    /// Create fragment
    pub fn new(
        type_name: impl Into<String>,
        type_type: TypeKind,
        type_def: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            type_type,
            type_def: type_def.into(),
            origin: origin.into(),
        }
    }
}

/// Assembled schema, fragments in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SchemaDocument {
    fragments: Vec<SchemaFragment>,
}

impl SchemaDocument {
    pub(crate) fn from_fragments(fragments: Vec<SchemaFragment>) -> Self {
        Self { fragments }
    }

    /// Fragments in insertion order
    #[inline]
    #[must_use]
    pub fn fragments(&self) -> &[SchemaFragment] {
        &self.fragments
    }

    /// Fragment defining `type_name`
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&SchemaFragment> {
        self.fragments.iter().find(|f| f.type_name == type_name)
    }

    /// Number of fragments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Check if document is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Schema definition text
    ///
    /// Byte-stable: equal documents render identical text.
    #[must_use]
    pub fn to_sdl(&self) -> String {
        let mut sdl = String::new();
        for fragment in &self.fragments {
            if !sdl.is_empty() {
                sdl.push('\n');
            }
            sdl.push_str(&fragment.type_def);
            sdl.push('\n');
        }
        sdl
    }

    /// Hex blake3 digest of [`to_sdl`](Self::to_sdl)
    #[must_use]
    pub fn content_hash(&self) -> String {
        blake3::hash(self.to_sdl().as_bytes()).to_hex().to_string()
    }
}
