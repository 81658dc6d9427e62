pub mod artist;
pub mod show;
pub mod venue;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Genre names for a venue or artist, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Genres(pub Vec<String>);

impl Genres {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for Genres {
    fn from(genres: Vec<String>) -> Self {
        Self(genres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genres_store_as_json_array() {
        let genres = Genres::from(vec!["Jazz".to_string(), "R&B".to_string()]);
        assert_eq!(serde_json::to_string(&genres).unwrap(), r#"["Jazz","R&B"]"#);

        let stored: Genres = serde_json::from_str("[]").unwrap();
        assert!(stored.as_slice().is_empty());
    }
}
