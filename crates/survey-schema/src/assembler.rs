//! Schema assembler
//!
//! Collects fragments in traversal order and refuses duplicate type names.

use crate::error::{SchemaError, SchemaResult};
use crate::fragment::{SchemaDocument, SchemaFragment};
use indexmap::IndexMap;

/// Order-preserving fragment collector
#[derive(Debug, Default)]
pub struct SchemaAssembler {
    fragments: IndexMap<String, SchemaFragment>,
}

impl SchemaAssembler {
    /// Create new empty assembler
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment
    ///
    /// # Errors
    /// Returns [`SchemaError::TypeNameCollision`] when a fragment with the
    /// same type name was already pushed; the first one is kept.
    pub fn push(&mut self, fragment: SchemaFragment) -> SchemaResult<()> {
        if let Some(first) = self.fragments.get(&fragment.type_name) {
            return Err(SchemaError::collision(
                fragment.type_name,
                first.origin.clone(),
                fragment.origin,
            ));
        }
        self.fragments.insert(fragment.type_name.clone(), fragment);
        Ok(())
    }

    /// Add every fragment, stopping at the first collision
    ///
    /// # Errors
    /// See [`push`](Self::push).
    pub fn extend(&mut self, fragments: impl IntoIterator<Item = SchemaFragment>) -> SchemaResult<()> {
        fragments.into_iter().try_for_each(|fragment| self.push(fragment))
    }

    /// Check if a type name is taken
    #[inline]
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.fragments.contains_key(type_name)
    }

    /// Number of fragments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Check if assembler is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Finish into a document, keeping insertion order
    #[must_use]
    pub fn finish(self) -> SchemaDocument {
        SchemaDocument::from_fragments(self.fragments.into_values().collect())
    }
}
