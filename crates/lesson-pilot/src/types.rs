//! Core data types for lesson challenges.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One exercise within a lesson, tagged by interaction type.
///
/// The wire form is an object carrying a `type` tag. Known tags are parsed
/// strictly into their variant; any other tag becomes
/// [`Challenge::Unrecognized`] so the dispatcher can halt on it.
#[derive(Debug, Clone, PartialEq)]
pub enum Challenge {
    CharacterIntro(CharacterIntro),
    CharacterSelect(CharacterSelect),
    Translate(Translate),
    CharacterMatch(CharacterMatch),
    ListenTap(ListenTap),
    SelectPronunciation(SelectPronunciation),
    Select(Select),
    Unrecognized(UnrecognizedChallenge),
}

/// Single-choice selection among rendered options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterIntro {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub choices: Vec<String>,
    pub correct_index: usize,
}

/// Single-choice selection; the choice set is only rendered, never listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSelect {
    #[serde(default)]
    pub prompt: String,
    pub correct_index: usize,
}

/// Free-text or word-bank translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translate {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub correct_solutions: Vec<String>,
    #[serde(default)]
    pub correct_tokens: Vec<String>,
}

/// A set of pairs to tap in correspondence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterMatch {
    pub pairs: Vec<Pair>,
}

/// One transliteration/character pair of a [`CharacterMatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub transliteration: String,
    pub character: String,
}

/// Audio-based entry answered by typing the concatenated tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenTap {
    #[serde(default)]
    pub prompt: String,
    pub correct_tokens: Vec<String>,
    #[serde(default)]
    pub correct_indices: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectPronunciation {
    pub correct_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Select {
    pub correct_index: usize,
}

/// A challenge whose `type` tag is outside the known catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct UnrecognizedChallenge {
    pub kind: String,
    pub raw: Value,
}

/// The seven interaction types understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChallengeKind {
    CharacterIntro,
    CharacterSelect,
    Translate,
    CharacterMatch,
    ListenTap,
    SelectPronunciation,
    Select,
}

impl ChallengeKind {
    pub const ALL: [ChallengeKind; 7] = [
        ChallengeKind::CharacterIntro,
        ChallengeKind::CharacterSelect,
        ChallengeKind::Translate,
        ChallengeKind::CharacterMatch,
        ChallengeKind::ListenTap,
        ChallengeKind::SelectPronunciation,
        ChallengeKind::Select,
    ];

    /// Look up a wire tag. `None` means the tag is not handled.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    pub fn tag(self) -> &'static str {
        match self {
            ChallengeKind::CharacterIntro => "characterIntro",
            ChallengeKind::CharacterSelect => "characterSelect",
            ChallengeKind::Translate => "translate",
            ChallengeKind::CharacterMatch => "characterMatch",
            ChallengeKind::ListenTap => "listenTap",
            ChallengeKind::SelectPronunciation => "selectPronunciation",
            ChallengeKind::Select => "select",
        }
    }
}

impl Challenge {
    /// The wire tag of this challenge.
    pub fn tag(&self) -> &str {
        match self {
            Challenge::Unrecognized(u) => u.kind.as_str(),
            known => known.kind().map(ChallengeKind::tag).unwrap_or_default(),
        }
    }

    /// The interaction type, or `None` for an unrecognized challenge.
    pub fn kind(&self) -> Option<ChallengeKind> {
        Some(match self {
            Challenge::CharacterIntro(_) => ChallengeKind::CharacterIntro,
            Challenge::CharacterSelect(_) => ChallengeKind::CharacterSelect,
            Challenge::Translate(_) => ChallengeKind::Translate,
            Challenge::CharacterMatch(_) => ChallengeKind::CharacterMatch,
            Challenge::ListenTap(_) => ChallengeKind::ListenTap,
            Challenge::SelectPronunciation(_) => ChallengeKind::SelectPronunciation,
            Challenge::Select(_) => ChallengeKind::Select,
            Challenge::Unrecognized(_) => return None,
        })
    }

    /// Parse a single challenge from its JSON form.
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(raw)
    }
}

impl<'de> Deserialize<'de> for Challenge {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let tag = raw
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| de::Error::missing_field("type"))?
            .to_string();

        let Some(kind) = ChallengeKind::from_tag(&tag) else {
            return Ok(Challenge::Unrecognized(UnrecognizedChallenge { kind: tag, raw }));
        };

        let parsed = match kind {
            ChallengeKind::CharacterIntro => {
                serde_json::from_value(raw).map(Challenge::CharacterIntro)
            }
            ChallengeKind::CharacterSelect => {
                serde_json::from_value(raw).map(Challenge::CharacterSelect)
            }
            ChallengeKind::Translate => serde_json::from_value(raw).map(Challenge::Translate),
            ChallengeKind::CharacterMatch => {
                serde_json::from_value(raw).map(Challenge::CharacterMatch)
            }
            ChallengeKind::ListenTap => serde_json::from_value(raw).map(Challenge::ListenTap),
            ChallengeKind::SelectPronunciation => {
                serde_json::from_value(raw).map(Challenge::SelectPronunciation)
            }
            ChallengeKind::Select => serde_json::from_value(raw).map(Challenge::Select),
        };

        parsed.map_err(|e| de::Error::custom(format!("invalid {tag} challenge: {e}")))
    }
}

/// The ordered challenges of one lesson, in required completion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lesson {
    challenges: Vec<Challenge>,
}

impl Lesson {
    pub fn new(challenges: Vec<Challenge>) -> Self {
        Self { challenges }
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Challenge> {
        self.challenges.iter()
    }
}

impl<'a> IntoIterator for &'a Lesson {
    type Item = &'a Challenge;
    type IntoIter = std::slice::Iter<'a, Challenge>;

    fn into_iter(self) -> Self::IntoIter {
        self.challenges.iter()
    }
}
