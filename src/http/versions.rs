use std::str::FromStr;

use crate::error::RecordError;
use crate::record::Version;

/// The `versions` query of a v2 GET.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionsQuery {
    /// `latest` (also used when the query is omitted).
    #[default]
    Latest,
    /// `all`
    All,
    /// `3,1,9999`: read these versions, in this order.
    List(Vec<Version>),
}

impl FromStr for VersionsQuery {
    type Err = RecordError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("latest") {
            return Ok(VersionsQuery::Latest);
        }
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(VersionsQuery::All);
        }

        trimmed
            .split(',')
            .map(|token| token.trim().parse::<Version>())
            .collect::<Result<Vec<_>, _>>()
            .map(VersionsQuery::List)
            .map_err(|_| RecordError::InvalidVersions(raw.to_string()))
    }
}

impl VersionsQuery {
    /// Parse an optional query value; absent means latest.
    pub fn from_param(raw: Option<&str>) -> Result<Self, RecordError> {
        match raw {
            Some(raw) => raw.parse(),
            None => Ok(VersionsQuery::Latest),
        }
    }
}
