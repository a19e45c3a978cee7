//! The fixed catalog of handbook chapter topics and validated selections.

use serde::{Deserialize, Serialize};

use super::Error;

/// One chapter topic a customer may opt into including in their handbook.
///
/// The catalog is closed: a selection may only reference these keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Introduktion och välkomstinformation.
    Intro,
    /// Medlemsinformation.
    Members,
    /// Styrelse och organisation.
    Board,
    /// Ordningsregler.
    Rules,
    /// Underhåll och skötsel.
    Maintenance,
    /// Ekonomi och avgifter.
    Economy,
    /// Miljö och hållbarhet.
    Environment,
    /// Viktiga kontaktuppgifter.
    Contact,
    /// Årskalender.
    Calendar,
}

impl Section {
    /// Every catalog entry, in presentation order.
    pub const ALL: [Self; 9] = [
        Self::Intro,
        Self::Members,
        Self::Board,
        Self::Rules,
        Self::Maintenance,
        Self::Economy,
        Self::Environment,
        Self::Contact,
        Self::Calendar,
    ];

    /// Stable key used on the wire and in the record store.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Members => "members",
            Self::Board => "board",
            Self::Rules => "rules",
            Self::Maintenance => "maintenance",
            Self::Economy => "economy",
            Self::Environment => "environment",
            Self::Contact => "contact",
            Self::Calendar => "calendar",
        }
    }

    /// Swedish display label shown in order summaries.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Intro => "Introduktion och välkomstinformation",
            Self::Members => "Medlemsinformation",
            Self::Board => "Styrelse och organisation",
            Self::Rules => "Ordningsregler",
            Self::Maintenance => "Underhåll och skötsel",
            Self::Economy => "Ekonomi och avgifter",
            Self::Environment => "Miljö och hållbarhet",
            Self::Contact => "Viktiga kontaktuppgifter",
            Self::Calendar => "Årskalender",
        }
    }

    /// Resolve a catalog key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.key() == key)
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// An ordered, duplicate-free set of catalog sections.
///
/// Order follows first mention, so a summary lists sections the way the
/// customer picked them. The empty selection is representable — a draft may
/// pass through the content step with nothing ticked — but submission is
/// guarded on non-emptiness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionSelection(Vec<Section>);

impl SectionSelection {
    /// An empty selection.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// The full catalog, mirroring the order form's select-all control.
    pub fn all() -> Self {
        Self(Section::ALL.to_vec())
    }

    /// Build a selection from sections, dropping duplicates while keeping
    /// first-mention order.
    pub fn new(sections: impl IntoIterator<Item = Section>) -> Self {
        let mut seen = Vec::new();
        for section in sections {
            if !seen.contains(&section) {
                seen.push(section);
            }
        }
        Self(seen)
    }

    /// Build a selection from raw catalog keys.
    ///
    /// # Errors
    ///
    /// Returns a validation [`Error`] naming the first key that is not part
    /// of the catalog.
    pub fn from_keys<S: AsRef<str>>(keys: impl IntoIterator<Item = S>) -> Result<Self, Error> {
        let mut sections = Vec::new();
        for key in keys {
            let key = key.as_ref();
            let section = Section::from_key(key).ok_or_else(|| {
                Error::validation(format!("unknown handbook section: {key}")).with_details(
                    serde_json::json!({ "field": "selectedSections", "value": key }),
                )
            })?;
            if !sections.contains(&section) {
                sections.push(section);
            }
        }
        Ok(Self(sections))
    }

    /// Sections in first-mention order.
    pub fn sections(&self) -> &[Section] {
        self.0.as_slice()
    }

    /// Stable keys in first-mention order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.0.iter().map(|section| section.key()).collect()
    }

    /// Number of distinct sections selected.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the selection contains the given section.
    pub fn contains(&self, section: Section) -> bool {
        self.0.contains(&section)
    }
}
