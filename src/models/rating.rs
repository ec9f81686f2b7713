//! Recall quality reported by the learner after revealing the response.
use crate::error::ReviewError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordinal rating, worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Failed recall, card goes back to the start.
    Again,
    /// Recalled with serious difficulty.
    Hard,
    /// Recalled after some hesitation.
    Good,
    /// Instant, confident recall.
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// Good and Easy count towards the session score.
    pub fn is_successful(self) -> bool {
        matches!(self, Rating::Good | Rating::Easy)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the names (any case) and the UI button numbers 1-4.
impl FromStr for Rating {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "again" | "a" | "1" => Ok(Rating::Again),
            "hard" | "h" | "2" => Ok(Rating::Hard),
            "good" | "g" | "3" => Ok(Rating::Good),
            "easy" | "e" | "4" => Ok(Rating::Easy),
            other => Err(ReviewError::InvalidArgument(format!(
                "unknown rating `{other}`; expected again|hard|good|easy"
            ))),
        }
    }
}

/// Parses a comma separated list such as `good,again,easy`.
pub fn parse_ratings(list: &str) -> crate::error::Result<Vec<Rating>> {
    list.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_numbers() {
        assert_eq!("Again".parse::<Rating>().unwrap(), Rating::Again);
        assert_eq!(" hard ".parse::<Rating>().unwrap(), Rating::Hard);
        assert_eq!("3".parse::<Rating>().unwrap(), Rating::Good);
        assert_eq!("e".parse::<Rating>().unwrap(), Rating::Easy);
    }

    #[test]
    fn test_unknown_rating_is_invalid_argument() {
        let err = "meh".parse::<Rating>().unwrap_err();
        assert!(matches!(err, ReviewError::InvalidArgument(_)));
    }

    #[test]
    fn test_parse_ratings_list() {
        let ratings = parse_ratings("good, again,easy").unwrap();
        assert_eq!(ratings, vec![Rating::Good, Rating::Again, Rating::Easy]);
        assert!(parse_ratings("good,nope").is_err());
        assert!(parse_ratings("").unwrap().is_empty());
    }

    #[test]
    fn test_ordering_and_success() {
        assert!(Rating::Again < Rating::Hard && Rating::Good < Rating::Easy);
        let successful: Vec<_> = Rating::ALL.iter().filter(|r| r.is_successful()).collect();
        assert_eq!(successful, vec![&Rating::Good, &Rating::Easy]);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Rating::Hard).unwrap(), "\"hard\"");
        let rating: Rating = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(rating, Rating::Easy);
        assert!(serde_json::from_str::<Rating>("\"meh\"").is_err());
    }
}
