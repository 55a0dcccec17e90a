use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Language {
    #[default]
    En,
    Id,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Id => "id",
        }
    }

    pub fn toggled(&self) -> Language {
        match self {
            Language::En => Language::Id,
            Language::Id => Language::En,
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "id" => Ok(Language::Id),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("unknown language '{0}'")]
pub struct UnknownLanguage(String);
