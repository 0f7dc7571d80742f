use serde::{Deserialize, Serialize};

/// Transit line a station belongs to.
///
/// `Undefined` is the sentinel for records that claim no line at all;
/// downstream consumers rely on it instead of an absent field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Line {
    Red,
    Blue,
    Green,
    Undefined,
}

impl Line {
    /// Returns the wire-level name of the line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Line::Red => "red",
            Line::Blue => "blue",
            Line::Green => "green",
            Line::Undefined => "undefined",
        }
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_lowercase_string() {
        assert_eq!(serde_json::to_string(&Line::Red).unwrap(), "\"red\"");
        assert_eq!(
            serde_json::to_string(&Line::Undefined).unwrap(),
            "\"undefined\""
        );
    }

    #[test]
    fn deserializes_from_lowercase_string() {
        let line: Line = serde_json::from_str("\"blue\"").unwrap();
        assert_eq!(line, Line::Blue);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(Line::Green.to_string(), "green");
    }
}
