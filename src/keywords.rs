use std::collections::BTreeMap;

/// One batch input row: field name → value.
///
/// Ordered so keyword registration order, output naming and logs are the same on
/// every run.
pub type Record = BTreeMap<String, String>;

pub const PLACEHOLDER_OPEN: &str = "{{";
pub const PLACEHOLDER_CLOSE: &str = "}}";

/// Wraps a bare field name in the `{{ }}` placeholder delimiters.
///
/// ```rust
/// use officeforge_rs::keywords::normalize_key;
///
/// assert_eq!(normalize_key("CLIENT_NAME"), "{{CLIENT_NAME}}");
/// assert_eq!(normalize_key("{{CLIENT_NAME}}"), "{{CLIENT_NAME}}");
/// ```
pub fn normalize_key(key: &str) -> String {
    if is_delimited(key) {
        key.to_string()
    } else {
        format!("{PLACEHOLDER_OPEN}{key}{PLACEHOLDER_CLOSE}")
    }
}

fn is_delimited(key: &str) -> bool {
    key.len() >= PLACEHOLDER_OPEN.len() + PLACEHOLDER_CLOSE.len()
        && key.starts_with(PLACEHOLDER_OPEN)
        && key.ends_with(PLACEHOLDER_CLOSE)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub token: String,
    pub replacement: String,
}

/// Ordered token → replacement pairs for one document run.
///
/// Registration order matters: when two different tokens match overlapping text in
/// the same unit, the one registered first wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    entries: Vec<Keyword>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(token: impl Into<String>, replacement: impl Into<String>) -> Self {
        let mut set = Self::new();
        set.insert(token, replacement);
        set
    }

    pub fn from_record(record: &Record) -> Self {
        record.iter().collect()
    }

    /// Registers `token`. Re-registering keeps the original position and takes the
    /// new replacement; empty tokens are ignored.
    pub fn insert(&mut self, token: impl Into<String>, replacement: impl Into<String>) {
        let token = token.into();
        let replacement = replacement.into();
        if token.is_empty() {
            log::warn!("ignoring empty keyword (replacement {replacement:?})");
            return;
        }
        match self.entries.iter_mut().find(|k| k.token == token) {
            Some(existing) => existing.replacement = replacement,
            None => self.entries.push(Keyword { token, replacement }),
        }
    }

    /// Same pairs with every token wrapped in `{{ }}`.
    pub fn normalized(&self) -> Self {
        self.entries
            .iter()
            .map(|k| (normalize_key(&k.token), k.replacement.clone()))
            .collect()
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|k| k.token == token)
            .map(|k| k.replacement.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyword> {
        self.entries.iter()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|k| k.token.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        for (token, replacement) in iter {
            set.insert(token, replacement);
        }
        set
    }
}

impl<'a> IntoIterator for &'a KeywordSet {
    type Item = &'a Keyword;
    type IntoIter = std::slice::Iter<'a, Keyword>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
