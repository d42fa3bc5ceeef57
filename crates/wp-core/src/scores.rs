//! Fixed-shape score maps.
//!
//! Every assessment carries four maps (RIASEC interest, aptitude, Big Five
//! personality, academic). Each map has a fixed key set, is zero-initialized,
//! and serializes as a flat JSON object keyed by the snake_case trait name.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{RiasecType, ScoringType};

/// Declares a score map struct with a fixed key set plus string-keyed access.
macro_rules! score_map {
    ($(#[$meta:meta])* $name:ident { $($field:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
        pub struct $name {
            $(
                #[serde(default)]
                pub $field: u32,
            )+
        }

        impl $name {
            /// Bucket names in declaration order.
            pub const KEYS: &'static [&'static str] = &[$(stringify!($field)),+];

            /// Read a bucket by name. `None` for keys outside the fixed shape.
            #[must_use]
            pub fn get(&self, key: &str) -> Option<u32> {
                $(
                    if key == stringify!($field) {
                        return Some(self.$field);
                    }
                )+
                None
            }

            /// Write a bucket by name. Returns `false` for unknown keys.
            pub fn set(&mut self, key: &str, value: u32) -> bool {
                $(
                    if key == stringify!($field) {
                        self.$field = value;
                        return true;
                    }
                )+
                false
            }

            /// `(key, value)` pairs in declaration order.
            #[must_use]
            pub fn entries(&self) -> Vec<(&'static str, u32)> {
                vec![$((stringify!($field), self.$field)),+]
            }
        }
    };
}

score_map!(
    /// Holland interest scores.
    RiasecScores {
        realistic,
        investigative,
        artistic,
        social,
        enterprising,
        conventional,
    }
);

score_map!(
    /// Aptitude scores.
    AptitudeScores {
        numerical,
        verbal,
        spatial,
        logical,
        technical,
        analytical,
        creative,
        attention,
        critical,
    }
);

score_map!(
    /// Big Five personality scores.
    PersonalityScores {
        extraversion,
        agreeableness,
        conscientiousness,
        emotional_stability,
        openness,
    }
);

score_map!(
    /// Academic self-assessment scores.
    AcademicScores {
        mathematics,
        science,
        languages,
        social_studies,
        computer_science,
        study_time,
        learning_confidence,
    }
);

impl RiasecScores {
    #[must_use]
    pub const fn of(&self, kind: RiasecType) -> u32 {
        match kind {
            RiasecType::Realistic => self.realistic,
            RiasecType::Investigative => self.investigative,
            RiasecType::Artistic => self.artistic,
            RiasecType::Social => self.social,
            RiasecType::Enterprising => self.enterprising,
            RiasecType::Conventional => self.conventional,
        }
    }

    /// Types sorted by score, highest first. Ties keep RIASEC order.
    #[must_use]
    pub fn ranked(&self) -> Vec<(RiasecType, u32)> {
        let mut ranked: Vec<(RiasecType, u32)> =
            RiasecType::ALL.iter().map(|&t| (t, self.of(t))).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// The four score maps of a completed assessment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Scores {
    #[serde(default)]
    pub riasec: RiasecScores,
    #[serde(default)]
    pub aptitude: AptitudeScores,
    #[serde(default)]
    pub personality: PersonalityScores,
    #[serde(default)]
    pub academic: AcademicScores,
}

impl Scores {
    /// Whether `key` is a bucket of the map selected by `scoring_type`.
    #[must_use]
    pub fn accepts(scoring_type: ScoringType, key: &str) -> bool {
        let keys = match scoring_type {
            ScoringType::Riasec => RiasecScores::KEYS,
            ScoringType::Aptitude => AptitudeScores::KEYS,
            ScoringType::BigFive => PersonalityScores::KEYS,
            ScoringType::Academic => AcademicScores::KEYS,
        };
        keys.contains(&key)
    }

    /// Write one bucket. Returns `false` if the key does not belong to the map.
    pub fn set(&mut self, scoring_type: ScoringType, key: &str, value: u32) -> bool {
        match scoring_type {
            ScoringType::Riasec => self.riasec.set(key, value),
            ScoringType::Aptitude => self.aptitude.set(key, value),
            ScoringType::BigFive => self.personality.set(key, value),
            ScoringType::Academic => self.academic.set(key, value),
        }
    }

    #[must_use]
    pub fn get(&self, scoring_type: ScoringType, key: &str) -> Option<u32> {
        match scoring_type {
            ScoringType::Riasec => self.riasec.get(key),
            ScoringType::Aptitude => self.aptitude.get(key),
            ScoringType::BigFive => self.personality.get(key),
            ScoringType::Academic => self.academic.get(key),
        }
    }
}
