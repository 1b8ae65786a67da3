//! Identifier resolution
//!
//! Locale tag → ISO 639-3 code → taxonomy node id.
//!
//! ```text
//! "sr-Latn-RS"
//!     │  base subtag
//!     ▼
//!    "sr" ──ISO 639-1 table──► "srp"
//!                                │  external-code index
//!                                ├── hit  ──► node id
//!                                └── miss ──► fallback "hbs" ──► node id
//! ```

pub mod fallback;
pub mod iso639;
pub mod locale;

pub use fallback::{MacrolanguageFallbacks, MACROLANGUAGE_FALLBACKS};
pub use locale::base_subtag;

use tracing::debug;

use crate::error::LookupError;
use crate::taxonomy::Taxonomy;

/// A locale tag pinned to a taxonomy node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLanguage {
    /// Tag as the caller supplied it
    pub tag: String,
    /// Code that matched the external-code index
    pub code: String,
    pub node_id: String,
    /// Whether `code` came from the macrolanguage fallback table
    pub via_fallback: bool,
}

/// Resolves locale tags against a taxonomy.
#[derive(Debug, Clone, Default)]
pub struct IdentifierResolver {
    fallbacks: MacrolanguageFallbacks,
}

impl IdentifierResolver {
    pub fn new(fallbacks: MacrolanguageFallbacks) -> Self {
        Self { fallbacks }
    }

    pub fn fallbacks(&self) -> &MacrolanguageFallbacks {
        &self.fallbacks
    }

    /// Three-letter code for a locale tag, before any taxonomy lookup.
    ///
    /// Two-letter subtags go through the ISO 639-1 table; a subtag with no
    /// mapping is kept only if it is already three characters long.
    pub fn external_code(&self, tag: &str) -> Option<String> {
        let subtag = base_subtag(tag);
        match iso639::to_639_3(&subtag) {
            Some(code) => Some(code.to_string()),
            None if subtag.chars().count() == 3 => Some(subtag),
            None => None,
        }
    }

    /// Resolve a tag to a node, trying the macrolanguage fallback once.
    pub fn resolve(&self, taxonomy: &Taxonomy, tag: &str) -> Result<ResolvedLanguage, LookupError> {
        let unresolvable = || LookupError::Unresolvable(tag.to_string());
        let code = self.external_code(tag).ok_or_else(unresolvable)?;

        if let Some(node_id) = taxonomy.id_for_code(&code) {
            return Ok(ResolvedLanguage {
                tag: tag.to_string(),
                code,
                node_id: node_id.to_string(),
                via_fallback: false,
            });
        }

        let fallback = self.fallbacks.get(&code).ok_or_else(unresolvable)?;
        let node_id = taxonomy.id_for_code(fallback).ok_or_else(unresolvable)?;
        debug!(tag, code = %code, fallback, "Resolved via macrolanguage fallback");

        Ok(ResolvedLanguage {
            tag: tag.to_string(),
            code: fallback.to_string(),
            node_id: node_id.to_string(),
            via_fallback: true,
        })
    }
}
