use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::vector::Vector;

/// Language code the catalog text is anchored to.
pub const ENGLISH: &str = "en";

/// Maximum number of tips surfaced in a localized view.
pub const MAX_TIPS: usize = 3;

/// Text keyed by language code (`en`, `ur`, ...). Sorted so serialization is stable.
pub type LanguageMap = BTreeMap<String, String>;

/// One curated catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemedyRecord {
    pub name: LanguageMap,
    pub symptoms: LanguageMap,
    pub dosage: LanguageMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<BTreeMap<String, Vec<String>>>,
    /// Fields the curated catalog carries that matching does not use.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RemedyRecord {
    pub fn new(name: LanguageMap, symptoms: LanguageMap, dosage: LanguageMap) -> Self {
        Self {
            name,
            symptoms,
            dosage,
            tips: None,
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_tips(mut self, lang: &str, tips: Vec<String>) -> Self {
        self.tips
            .get_or_insert_with(BTreeMap::new)
            .insert(lang.to_string(), tips);
        self
    }

    pub fn english_name(&self) -> Option<&str> {
        self.name.get(ENGLISH).map(String::as_str)
    }

    pub fn english_symptoms(&self) -> Option<&str> {
        self.symptoms.get(ENGLISH).map(String::as_str)
    }

    /// Best-effort label for log lines.
    pub fn label(&self) -> &str {
        self.english_name()
            .or_else(|| self.name.values().next().map(String::as_str))
            .unwrap_or("<unnamed>")
    }

    /// The only text ever embedded for this entry: `"{name.en} - {symptoms.en}"`.
    ///
    /// Returns `None` when either English field is missing.
    pub fn canonical_text(&self) -> Option<String> {
        let name = self.english_name()?;
        let symptoms = self.english_symptoms()?;
        Some(format!("{} - {}", name, symptoms))
    }

    /// Text for `lang`, falling back to English for name, symptoms and dosage.
    /// Tips only come from the exact language and are capped at [`MAX_TIPS`].
    pub fn localized(&self, lang: Language) -> LocalizedRemedy {
        let code = lang.code();
        let pick = |map: &LanguageMap| {
            map.get(code)
                .or_else(|| map.get(ENGLISH))
                .cloned()
                .unwrap_or_default()
        };

        let tips = self
            .tips
            .as_ref()
            .and_then(|tips| tips.get(code))
            .map(|tips| tips.iter().take(MAX_TIPS).cloned().collect())
            .unwrap_or_default();

        LocalizedRemedy {
            language: lang,
            name: pick(&self.name),
            symptoms: pick(&self.symptoms),
            dosage: pick(&self.dosage),
            tips,
        }
    }
}

/// A record paired with its stored embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexedRemedy {
    pub embedding: Vector,
    #[serde(rename = "original_data")]
    pub remedy: RemedyRecord,
}

impl IndexedRemedy {
    #[inline]
    #[must_use]
    pub fn new(embedding: Vector, remedy: RemedyRecord) -> Self {
        Self { embedding, remedy }
    }
}

/// Reply language of the surrounding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ur,
    /// Roman Urdu. The catalog has no key of its own for it.
    Roman,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ur => "ur",
            Language::Roman => "roman",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ur" | "urdu" => Ok(Language::Ur),
            "roman" | "roman-urdu" | "roman_urdu" => Ok(Language::Roman),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

/// Display fields of a remedy resolved for one language.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LocalizedRemedy {
    pub language: Language,
    pub name: String,
    pub symptoms: String,
    pub dosage: String,
    pub tips: Vec<String>,
}
