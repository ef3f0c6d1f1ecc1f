/// A single key/value pair copied out of the store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    key: String,
    value: String,
}

impl Entry {
    /// Creates a new entry from a key and its value
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns the key as a string slice
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stored value as a string slice
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Splits the entry into its owned key and value
    pub fn into_parts(self) -> (String, String) {
        (self.key, self.value)
    }
}

impl From<(String, String)> for Entry {
    fn from((key, value): (String, String)) -> Self {
        Self { key, value }
    }
}
