//! Flattened request parameters.

/// An insertion-ordered table of `name = value` parameters.
///
/// Encoders write nested values under dotted paths (`Tags.1`,
/// `Attributes.2.key`). Putting a name that already exists replaces its
/// value without moving it.
///
/// ## Examples
///
/// ```
/// use shapegen::Params;
///
/// let mut params = Params::new();
/// params.put("Action", "GetGadget");
/// params.put("Tags.1", "red");
/// params.put("Action", "ListGadgets");
///
/// assert_eq!(params.get("Action"), Some("ListGadgets"));
/// assert_eq!(params.pairs()[1], ("Tags.1".to_string(), "red".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`.
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.pairs.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// All parameters in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
