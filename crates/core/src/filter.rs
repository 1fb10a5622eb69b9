use remote::ProjectRecord;
use std::fmt;
use std::str::FromStr;

pub const ALL: &str = "all";

/// Active filter chip. Starts at `All`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterState {
    #[default]
    All,
    Tag(String),
}

impl FilterState {
    pub fn matches(&self, record: &ProjectRecord) -> bool {
        match self {
            FilterState::All => true,
            FilterState::Tag(tag) => record.tags.iter().any(|t| t == tag),
        }
    }
}

impl FromStr for FilterState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL {
            FilterState::All
        } else {
            FilterState::Tag(s.to_string())
        })
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterState::All => f.write_str(ALL),
            FilterState::Tag(tag) => f.write_str(tag),
        }
    }
}

/// Records visible under `active`. `All` yields the list unchanged.
pub fn select<'a>(records: &'a [ProjectRecord], active: &FilterState) -> Vec<&'a ProjectRecord> {
    records.iter().filter(|r| active.matches(r)).collect()
}
