//! Semicolon-delimited `key: value` attribute parsing.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered product attributes parsed from free text.
///
/// Entries keep the order in which keys first appeared. A repeated key
/// replaces the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<(String, String)>,
}

impl AttributeMap {
    /// Parses `"sabor: coco; peso: 120 g"` style text.
    ///
    /// Segments are split on `;`, then on the first `:` only, so values may
    /// contain further colons. Segments without a `:` are ignored. Never fails.
    pub fn parse(text: &str) -> Self {
        let mut map = Self::default();
        for part in text.split(';') {
            if let Some((key, value)) = part.split_once(':') {
                map.insert(key.trim(), value.trim());
            }
        }
        map
    }

    fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no attribute was parsed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl IntoIterator for AttributeMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Shorthand for [`AttributeMap::parse`].
pub fn parse_attributes(text: &str) -> AttributeMap {
    AttributeMap::parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_without_colon_are_dropped() {
        let attrs = AttributeMap::parse("sabor: coco; sin azúcar; alto en fibra");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("sabor"), Some("coco"));
        assert_eq!(attrs.get("sin azúcar"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let attrs = AttributeMap::parse("a:1;a:2");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("a"), Some("2"));
    }

    #[test]
    fn test_repeated_key_keeps_first_position() {
        let attrs = AttributeMap::parse("a:1; b:2; a:3");
        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_value_may_contain_colons() {
        let attrs = AttributeMap::parse("horario: 10:00-18:00");
        assert_eq!(attrs.get("horario"), Some("10:00-18:00"));
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(AttributeMap::parse("").is_empty());
        assert!(AttributeMap::parse(" ; ;; ").is_empty());
    }

    #[test]
    fn test_keys_are_trimmed_substrings_of_input() {
        let input = "  peso :  120 g ;marca:Ángel  ";
        let attrs = parse_attributes(input);
        for (k, v) in attrs.iter() {
            assert!(input.contains(k));
            assert_eq!(k, k.trim());
            assert_eq!(v, v.trim());
        }
        assert_eq!(attrs.get("peso"), Some("120 g"));
        assert_eq!(attrs.get("marca"), Some("Ángel"));
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let attrs = AttributeMap::parse("z: 1; a: 2");
        let json = serde_json::to_string(&attrs).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);
    }
}
