//! Macrolanguage fallbacks
//!
//! General-purpose registries hand out macrolanguage codes (`zho`, `ara`,
//! `fas`) where the taxonomy only codes the individual varieties, and the
//! reverse for Serbo-Croatian. When a code is missing from the taxonomy the
//! resolver retries once with the mapped code.

use std::collections::HashMap;

/// Known registry → taxonomy code mismatches.
pub static MACROLANGUAGE_FALLBACKS: &[(&str, &str)] = &[
    // Serbian/Croatian/Bosnian -> Serbo-Croatian
    ("hrv", "hbs"),
    ("srp", "hbs"),
    ("bos", "hbs"),
    // Arabic -> Standard Arabic
    ("ara", "arb"),
    // Chinese -> Mandarin
    ("zho", "cmn"),
    // Azerbaijani -> North Azerbaijani
    ("aze", "azj"),
    // Estonian -> Standard Estonian
    ("est", "ekk"),
    // Malagasy -> Plateau Malagasy
    ("mlg", "plt"),
    // Malay -> Standard Malay
    ("msa", "zsm"),
    // Oriya -> Odia
    ("ori", "ory"),
    // Persian -> Western Farsi
    ("fas", "pes"),
    // Swahili -> Swahili (individual language)
    ("swa", "swh"),
    // Norwegian -> Bokmål
    ("nor", "nob"),
    // Latvian -> Standard Latvian
    ("lav", "lvs"),
    // Uzbek -> Northern Uzbek
    ("uzb", "uzn"),
    // Mongolian -> Halh Mongolian
    ("mon", "khk"),
];

/// Lookup table of fallback codes, seeded from `MACROLANGUAGE_FALLBACKS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacrolanguageFallbacks {
    table: HashMap<String, String>,
}

impl Default for MacrolanguageFallbacks {
    fn default() -> Self {
        Self::from_pairs(MACROLANGUAGE_FALLBACKS.iter().copied())
    }
}

impl MacrolanguageFallbacks {
    /// A table with no entries
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            table: pairs
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        }
    }

    /// Add or replace entries
    pub fn extend<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.table
            .extend(pairs.into_iter().map(|(from, to)| (from.into(), to.into())));
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.table.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
