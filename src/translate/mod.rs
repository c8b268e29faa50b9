//! Translation lookups.
//!
//! A [`Translator`] returns the key itself when it has no translation for it.
//! That sentinel is how the rest of the crate tells a real translation from a
//! missing one.

pub mod catalog;

pub use catalog::Catalog;

pub trait Translator {
    fn translate(&self, key: &str) -> String;

    /// List form: the first key with a real translation, otherwise the first key.
    fn translate_first(&self, keys: &[String]) -> String {
        keys.iter()
            .find_map(|key| {
                let translated = self.translate(key);
                (translated != *key).then_some(translated)
            })
            .or_else(|| keys.first().cloned())
            .unwrap_or_default()
    }
}

impl<F> Translator for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, key: &str) -> String {
        self(key)
    }
}

/// A single key or an ordered list of candidates.
#[derive(Debug, Clone, Copy)]
pub enum KeyLookup<'a> {
    Key(&'a str),
    Candidates(&'a [String]),
}

impl<'a> From<&'a str> for KeyLookup<'a> {
    fn from(key: &'a str) -> Self {
        KeyLookup::Key(key)
    }
}

impl<'a> From<&'a String> for KeyLookup<'a> {
    fn from(key: &'a String) -> Self {
        KeyLookup::Key(key)
    }
}

impl<'a> From<&'a [String]> for KeyLookup<'a> {
    fn from(keys: &'a [String]) -> Self {
        KeyLookup::Candidates(keys)
    }
}

impl<'a> From<&'a Vec<String>> for KeyLookup<'a> {
    fn from(keys: &'a Vec<String>) -> Self {
        KeyLookup::Candidates(keys)
    }
}

/// Returns a translation only when one is registered.
///
/// Candidates are tried in order and the search stops at the first hit; each
/// key tried is passed to the translator once.
pub fn conditional_translate<'a>(
    lookup: impl Into<KeyLookup<'a>>,
    translator: &dyn Translator,
) -> Option<String> {
    match lookup.into() {
        KeyLookup::Key(key) => {
            let translated = translator.translate(key);
            (translated != key).then_some(translated)
        }
        KeyLookup::Candidates(keys) => keys
            .iter()
            .find_map(|key| conditional_translate(key, translator)),
    }
}

/// `summary`, `label`, `legend` fallbacks for a field's display name.
pub fn field_label_keys(field: &str) -> Vec<String> {
    vec![
        format!("fields.{field}.summary"),
        format!("fields.{field}.label"),
        format!("fields.{field}.legend"),
    ]
}
