use serde::Deserialize;

use crate::models::UNSPECIFIED_MOOD;

// -- Auth --

// Browser forms may omit a field entirely; a missing field reads as blank.

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmation: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// -- Memories --

#[derive(Debug, Deserialize)]
pub struct NewMemoryForm {
    #[serde(default)]
    pub memory: String,
    pub mood: Option<String>,
}

impl NewMemoryForm {
    /// The submitted mood. An empty selection, or the label that counts
    /// stand in for a missing mood, is stored as no mood.
    pub fn mood(&self) -> Option<&str> {
        self.mood
            .as_deref()
            .filter(|m| !m.is_empty() && *m != UNSPECIFIED_MOOD)
    }
}

// -- Export --

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

impl ExportQuery {
    pub fn format_or_default(&self) -> &str {
        self.format.as_deref().unwrap_or("csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(mood: Option<&str>) -> NewMemoryForm {
        NewMemoryForm {
            memory: "walk".into(),
            mood: mood.map(str::to_string),
        }
    }

    #[test]
    fn test_blank_and_placeholder_moods_are_no_mood() {
        assert_eq!(form(None).mood(), None);
        assert_eq!(form(Some("")).mood(), None);
        assert_eq!(form(Some(UNSPECIFIED_MOOD)).mood(), None);
        assert_eq!(form(Some("happy")).mood(), Some("happy"));
        assert_eq!(form(Some("grumpy")).mood(), Some("grumpy"));
    }

    #[test]
    fn test_export_format_defaults_to_csv() {
        assert_eq!(ExportQuery { format: None }.format_or_default(), "csv");
        let json = ExportQuery { format: Some("json".into()) };
        assert_eq!(json.format_or_default(), "json");
    }
}
