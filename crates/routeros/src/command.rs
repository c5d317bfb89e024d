//! Command and reply model
//!
//! A command is a menu path such as `/ip/hotspot/user/add` plus an ordered
//! list of `name=value` attributes. Replies are lists of attribute maps.

use std::fmt;

use serde_json::{Map, Value};

/// One reply record: the attribute map the router returned for an item
pub type Record = Map<String, Value>;

/// A single router command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    path: String,
    attributes: Vec<(String, String)>,
}

impl Command {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            attributes: Vec::new(),
        }
    }

    /// Appends an attribute, keeping insertion order
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Looks up the value of an attribute by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attributes as a JSON object, the body shape of the REST interface
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .attributes
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect();
        Value::Object(map)
    }
}

// Passwords travel as attributes, so only the path and attribute names are shown.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (name, _) in &self.attributes {
            write!(f, " ={}=…", name)?;
        }
        Ok(())
    }
}

/// Commands on the hotspot user menu
pub mod hotspot {
    use super::Command;

    pub const USER_PRINT: &str = "/ip/hotspot/user/print";
    pub const USER_ADD: &str = "/ip/hotspot/user/add";
    pub const USER_REMOVE: &str = "/ip/hotspot/user/remove";

    pub fn print_users() -> Command {
        Command::new(USER_PRINT)
    }

    pub fn add_user(name: &str, password: &str, profile: &str) -> Command {
        Command::new(USER_ADD)
            .attr("name", name)
            .attr("password", password)
            .attr("profile", profile)
    }

    /// `numbers` accepts the router's internal id (`*1A`) or a print index
    pub fn remove_user(id: &str) -> Command {
        Command::new(USER_REMOVE).attr("numbers", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_user_keeps_attribute_order() {
        let cmd = hotspot::add_user("alice", "s3cret", "default");
        assert_eq!(cmd.path(), "/ip/hotspot/user/add");
        assert_eq!(
            cmd.attributes(),
            [
                ("name".to_string(), "alice".to_string()),
                ("password".to_string(), "s3cret".to_string()),
                ("profile".to_string(), "default".to_string()),
            ]
        );
        assert_eq!(cmd.get("profile"), Some("default"));
    }

    #[test]
    fn display_hides_values() {
        let cmd = hotspot::add_user("alice", "s3cret", "default");
        let shown = cmd.to_string();
        assert!(shown.starts_with("/ip/hotspot/user/add"));
        assert!(!shown.contains("s3cret"));
    }

    #[test]
    fn remove_user_json_body() {
        let cmd = hotspot::remove_user("*1A");
        assert_eq!(cmd.to_json(), serde_json::json!({ "numbers": "*1A" }));
    }

    #[test]
    fn print_has_no_attributes() {
        let cmd = hotspot::print_users();
        assert!(cmd.attributes().is_empty());
        assert_eq!(cmd.to_json(), serde_json::json!({}));
    }
}
