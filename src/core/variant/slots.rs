// ─── Attribute slots ───
// One enum per independently-selectable attribute. Every slot carries an
// explicit Default/No value, so "all slots present, defaulted" is a
// compile-time guarantee rather than a runtime lookup.

use serde::{Deserialize, Serialize};

/// Outfit top color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Top {
    #[default]
    Default,
    Red,
    Black,
    White,
}

impl Top {
    pub(crate) fn from_token(token: &str) -> Option<Self> {
        match token {
            "red" => Some(Top::Red),
            "black" => Some(Top::Black),
            "white" => Some(Top::White),
            _ => None,
        }
    }

    pub(crate) fn token(self) -> Option<&'static str> {
        match self {
            Top::Default => None,
            Top::Red => Some("red"),
            Top::Black => Some("black"),
            Top::White => Some("white"),
        }
    }

    pub(crate) fn label_fragment(self) -> Option<String> {
        self.token().map(|t| format!("{} Top", capitalize(t)))
    }
}

/// Skirt length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skirt {
    #[default]
    Default,
    Short,
    Long,
}

impl Skirt {
    pub(crate) fn from_token(token: &str) -> Option<Self> {
        match token {
            "short" => Some(Skirt::Short),
            "long" => Some(Skirt::Long),
            _ => None,
        }
    }

    pub(crate) fn token(self) -> Option<&'static str> {
        match self {
            Skirt::Default => None,
            Skirt::Short => Some("short"),
            Skirt::Long => Some("long"),
        }
    }

    pub(crate) fn label_fragment(self) -> Option<String> {
        self.token().map(|t| format!("{} Skirt", capitalize(t)))
    }
}

/// Stocking style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stockings {
    #[default]
    No,
    Fishnet,
    Sheer,
}

impl Stockings {
    pub(crate) fn from_token(token: &str) -> Option<Self> {
        match token {
            "fishnet" => Some(Stockings::Fishnet),
            "sheer" => Some(Stockings::Sheer),
            _ => None,
        }
    }

    pub(crate) fn token(self) -> Option<&'static str> {
        match self {
            Stockings::No => None,
            Stockings::Fishnet => Some("fishnet"),
            Stockings::Sheer => Some("sheer"),
        }
    }

    pub(crate) fn label_fragment(self) -> Option<String> {
        self.token()
            .map(|t| format!("{} Stockings", capitalize(t)))
    }
}

/// Flag slot: belt sash accessory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeltSash {
    #[default]
    No,
    Yes,
}

/// Flag slot: gloves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gloves {
    #[default]
    No,
    Yes,
}

/// Flag slot: garter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Garter {
    #[default]
    No,
    Yes,
}

/// Flag slot: dress body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dress {
    #[default]
    No,
    Yes,
}

/// Flag slot: futa body variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Futa {
    #[default]
    No,
    Yes,
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
