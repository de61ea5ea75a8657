use std::borrow::Cow;

/// Re-indents single-line JSON objects that look like protocol frames.
///
/// Purely a log-rendering aid: anything that is not a single JSON object
/// carrying one of the marker keys comes back untouched.
#[derive(Debug, Clone)]
pub struct PrettyPrinter {
    enabled: bool,
    markers: Vec<String>,
}

impl PrettyPrinter {
    pub fn new(enabled: bool, markers: Vec<String>) -> Self {
        Self { enabled, markers }
    }

    pub fn disabled() -> Self {
        Self::new(false, Vec::new())
    }

    /// Returns the indented rendering (terminated by `\n`) or the original line.
    pub fn render<'a>(&self, line: &'a str) -> Cow<'a, str> {
        if !self.enabled {
            return Cow::Borrowed(line);
        }
        let s = line.trim();
        if !(s.starts_with('{') && s.ends_with('}')) {
            return Cow::Borrowed(line);
        }
        let Ok(serde_json::Value::Object(obj)) = serde_json::from_str::<serde_json::Value>(s) else {
            return Cow::Borrowed(line);
        };
        if !self.markers.iter().any(|m| obj.contains_key(m)) {
            return Cow::Borrowed(line);
        }
        match serde_json::to_string_pretty(&obj) {
            Ok(mut pretty) => {
                pretty.push('\n');
                Cow::Owned(pretty)
            }
            Err(_) => Cow::Borrowed(line),
        }
    }
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        Self::new(true, vec!["jsonrpc".to_string()])
    }
}
