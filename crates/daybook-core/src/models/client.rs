//! Client data model

use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{normalize_name, same_name};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Create a client, trimming and validating the name
    pub fn new(id: i64, name: &str, created_at: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            id,
            name: normalize_name("Client", name)?,
            created_at,
        })
    }

    pub fn has_name(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client() {
        let now = Utc::now();
        let client = Client::new(1, " Acme ", now).unwrap();
        assert_eq!(client.name, "Acme");
        assert_eq!(client.created_at, now);
        assert!(client.has_name("ACME"));
    }

    #[test]
    fn test_client_empty_name() {
        assert!(Client::new(1, "", Utc::now()).is_err());
    }

    #[test]
    fn test_client_json_shape() {
        let client = Client::new(1700000000000, "Acme", Utc::now()).unwrap();
        let json = serde_json::to_value(&client).unwrap();
        assert_eq!(json["id"], 1700000000000i64);
        assert!(json.get("createdAt").is_some());
    }
}
