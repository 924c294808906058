use super::persist::LoadError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// A format-agnostic persisted element: a name, string attributes and
/// ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn set(&mut self, key: &str, value: impl Display) {
        self.attributes.insert(key.to_string(), value.to_string());
    }

    pub fn with(mut self, key: &str, value: impl Display) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The attribute value, failing the load when it is absent.
    pub fn require(&self, key: &str) -> Result<&str, LoadError> {
        self.get(key).ok_or_else(|| self.missing(key))
    }

    /// Parses a required attribute.
    pub fn parse<T: FromStr>(&self, key: &str) -> Result<T, LoadError> {
        let raw = self.require(key)?;
        self.convert(key, raw)
    }

    /// Parses an attribute that may be absent.
    pub fn parse_opt<T: FromStr>(&self, key: &str) -> Result<Option<T>, LoadError> {
        self.get(key).map(|raw| self.convert(key, raw)).transpose()
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Fails unless the node carries the expected name.
    pub fn expect_name(&self, expected: &str) -> Result<(), LoadError> {
        if self.name == expected {
            Ok(())
        } else {
            Err(LoadError::UnexpectedNode {
                expected: expected.to_string(),
                found: self.name.clone(),
            })
        }
    }

    pub(crate) fn missing(&self, key: &str) -> LoadError {
        LoadError::MissingAttribute {
            node: self.name.clone(),
            attribute: key.to_string(),
        }
    }

    pub(crate) fn invalid(&self, key: &str, value: &str) -> LoadError {
        LoadError::InvalidValue {
            node: self.name.clone(),
            attribute: key.to_string(),
            value: value.to_string(),
        }
    }

    fn convert<T: FromStr>(&self, key: &str, raw: &str) -> Result<T, LoadError> {
        raw.trim().parse().map_err(|_| self.invalid(key, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_parse_with_context_on_failure() {
        let node = Node::new("bond").with("order", 2).with("level", "x");
        assert_eq!(node.parse::<u8>("order").unwrap(), 2);
        assert!(matches!(
            node.parse::<i32>("level"),
            Err(LoadError::InvalidValue { attribute, value, .. }) if attribute == "level" && value == "x"
        ));
        assert!(matches!(
            node.parse::<i32>("type"),
            Err(LoadError::MissingAttribute { node, attribute }) if node == "bond" && attribute == "type"
        ));
        assert_eq!(node.parse_opt::<i32>("type").unwrap(), None);
    }

    #[test]
    fn empty_collections_are_not_serialized() {
        let json = serde_json::to_string(&Node::new("atom")).unwrap();
        assert_eq!(json, r#"{"name":"atom"}"#);
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Node::new("atom"));
    }

    #[test]
    fn unexpected_name_is_reported() {
        assert!(Node::new("atom").expect_name("atom").is_ok());
        assert!(matches!(
            Node::new("bond").expect_name("atom"),
            Err(LoadError::UnexpectedNode { .. })
        ));
    }
}
