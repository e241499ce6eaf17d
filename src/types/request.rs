//! Generation request types.

use serde::{Deserialize, Serialize};

use crate::{Result, SkaldError};

/// Kind of stay being reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    Business,
    Leisure,
    Family,
    Romance,
    Vacation,
}

impl TripType {
    /// Human-readable phrase used in prompts and templates.
    pub fn phrase(&self) -> &'static str {
        match self {
            TripType::Business => "business trip",
            TripType::Leisure => "leisure stay",
            TripType::Family => "family stay",
            TripType::Romance => "romantic getaway",
            TripType::Vacation => "vacation",
        }
    }
}

impl std::fmt::Display for TripType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TripType::Business => "business",
            TripType::Leisure => "leisure",
            TripType::Family => "family",
            TripType::Romance => "romance",
            TripType::Vacation => "vacation",
        };
        f.write_str(s)
    }
}

/// Narrative voice for generated text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Friendly,
    Professional,
    Enthusiastic,
}

impl Voice {
    /// Style instruction injected into provider prompts.
    pub fn style_instruction(&self) -> &'static str {
        match self {
            Voice::Friendly => "Write in a warm, friendly, conversational voice.",
            Voice::Professional => "Write in a measured, professional voice.",
            Voice::Enthusiastic => "Write in an upbeat, enthusiastic voice.",
        }
    }
}

/// A structured description of a hotel stay to generate review text for.
///
/// Immutable per call. The rating is validated at construction; everything
/// else has a sensible default and is set via chained setters:
///
/// ```rust
/// # use skald::{GenerationRequest, TripType, Voice};
/// let request = GenerationRequest::new("Grand Hotel", 5, TripType::Leisure)?
///     .highlights(["pool", "breakfast"])
///     .stay_length(3)
///     .voice(Voice::Enthusiastic);
/// # Ok::<(), skald::SkaldError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Name of the reviewed property.
    pub subject_name: String,
    /// Star rating, 1–5.
    #[serde(deserialize_with = "deserialize_rating")]
    pub rating: u8,
    /// Kind of stay.
    pub trip_type: TripType,
    /// Aspects worth mentioning, in caller order.
    #[serde(default)]
    pub highlights: Vec<String>,
    /// Length of stay in nights.
    #[serde(default = "default_stay_length")]
    pub stay_length: u32,
    /// Number of guests.
    #[serde(default = "default_guest_count")]
    pub guest_count: u32,
    /// BCP 47-ish language code; "en" means no language instruction.
    #[serde(default = "default_language")]
    pub language: String,
    /// Narrative voice.
    #[serde(default)]
    pub voice: Voice,
}

fn default_stay_length() -> u32 {
    1
}

fn default_guest_count() -> u32 {
    1
}

fn default_language() -> String {
    "en".to_string()
}

// Deserialized requests must honour the same rating bound `new()` enforces.
fn deserialize_rating<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let rating = u8::deserialize(deserializer)?;
    if !(1..=5).contains(&rating) {
        return Err(serde::de::Error::custom(format!(
            "rating must be between 1 and 5, got {rating}"
        )));
    }
    Ok(rating)
}

impl GenerationRequest {
    /// Create a request for the given subject, rating, and trip type.
    ///
    /// Returns `Configuration` if the rating is outside 1–5.
    pub fn new(subject_name: impl Into<String>, rating: u8, trip_type: TripType) -> Result<Self> {
        if !(1..=5).contains(&rating) {
            return Err(SkaldError::Configuration(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }
        Ok(Self {
            subject_name: subject_name.into(),
            rating,
            trip_type,
            highlights: Vec::new(),
            stay_length: default_stay_length(),
            guest_count: default_guest_count(),
            language: default_language(),
            voice: Voice::default(),
        })
    }

    /// Set the highlights to mention.
    pub fn highlights<I, S>(mut self, highlights: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.highlights = highlights.into_iter().map(Into::into).collect();
        self
    }

    /// Set the stay length in nights.
    pub fn stay_length(mut self, nights: u32) -> Self {
        self.stay_length = nights;
        self
    }

    /// Set the guest count.
    pub fn guest_count(mut self, guests: u32) -> Self {
        self.guest_count = guests;
        self
    }

    /// Set the output language code.
    pub fn language(mut self, code: impl Into<String>) -> Self {
        self.language = code.into();
        self
    }

    /// Set the narrative voice.
    pub fn voice(mut self, voice: Voice) -> Self {
        self.voice = voice;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_out_of_range_rating() {
        assert!(GenerationRequest::new("Inn", 0, TripType::Leisure).is_err());
        assert!(GenerationRequest::new("Inn", 6, TripType::Leisure).is_err());
        assert!(GenerationRequest::new("Inn", 1, TripType::Leisure).is_ok());
        assert!(GenerationRequest::new("Inn", 5, TripType::Leisure).is_ok());
    }

    #[test]
    fn setters_chain() {
        let req = GenerationRequest::new("Inn", 4, TripType::Family)
            .unwrap()
            .highlights(["pool"])
            .stay_length(2)
            .guest_count(4)
            .language("de")
            .voice(Voice::Professional);
        assert_eq!(req.highlights, vec!["pool"]);
        assert_eq!(req.stay_length, 2);
        assert_eq!(req.guest_count, 4);
        assert_eq!(req.language, "de");
        assert_eq!(req.voice, Voice::Professional);
    }

    #[test]
    fn deserialization_rejects_out_of_range_rating() {
        let json = r#"{"subject_name":"Inn","rating":0,"trip_type":"leisure"}"#;
        let err = serde_json::from_str::<GenerationRequest>(json).unwrap_err();
        assert!(err.to_string().contains("rating must be between 1 and 5"));

        let json = r#"{"subject_name":"Inn","rating":3,"trip_type":"leisure"}"#;
        let req: GenerationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.rating, 3);
        assert_eq!(req.language, "en");
    }

    #[test]
    fn trip_type_serde_lowercase() {
        let json = serde_json::to_string(&TripType::Romance).unwrap();
        assert_eq!(json, "\"romance\"");
    }
}
