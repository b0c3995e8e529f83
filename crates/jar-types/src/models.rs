use chrono::NaiveDateTime;
use serde::Serialize;

/// Layout used for `created_at` in storage and in every export format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Label counted in place of a memory saved without a mood.
pub const UNSPECIFIED_MOOD: &str = "unspecified";

/// The ranked mood vocabulary. Memories may carry any other label; those are
/// kept verbatim and score zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Happy,
    Content,
    Neutral,
    Sad,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Content, Mood::Neutral, Mood::Sad];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "happy" => Some(Self::Happy),
            "content" => Some(Self::Content),
            "neutral" => Some(Self::Neutral),
            "sad" => Some(Self::Sad),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Content => "content",
            Self::Neutral => "neutral",
            Self::Sad => "sad",
        }
    }

    pub fn rank(self) -> u32 {
        match self {
            Self::Happy => 3,
            Self::Content => 2,
            Self::Neutral => 1,
            Self::Sad => 0,
        }
    }

    /// Happiness contributed by a stored mood label. Unknown and missing labels score 0.
    pub fn score(label: Option<&str>) -> u32 {
        label.and_then(Self::from_label).map_or(0, Self::rank)
    }
}

/// A journal entry as shown to its owner and written to exports.
///
/// Field names match the stored columns so the JSON export keeps them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryEntry {
    pub memory: String,
    pub mood: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
}

impl MemoryEntry {
    pub fn created_at_string(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

fn serialize_timestamp<S: serde::Serializer>(
    value: &NaiveDateTime,
    s: S,
) -> Result<S::Ok, S::Error> {
    s.collect_str(&value.format(TIMESTAMP_FORMAT))
}
