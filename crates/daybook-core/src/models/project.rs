//! Project data model

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{normalize_name, same_name};

/// Highest hourly rate a project may carry.
pub const MAX_RATE: f64 = 10_000.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub client_id: i64,
    #[serde(default)]
    pub rate: f64,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(
        id: i64,
        name: &str,
        client_id: i64,
        rate: f64,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        validate_rate(rate)?;
        Ok(Self {
            id,
            name: normalize_name("Project", name)?,
            client_id,
            rate,
            created_at,
        })
    }

    pub fn has_name(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }

    pub fn is_billable(&self) -> bool {
        self.rate > 0.0
    }
}

/// Parse the rate as typed by the user. Blank input means no rate.
pub fn parse_rate(text: &str) -> Result<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }

    let rate: f64 = text
        .parse()
        .map_err(|_| Error::Validation(format!("Rate '{}' is not a number", text)))?;
    validate_rate(rate)?;
    Ok(rate)
}

fn validate_rate(rate: f64) -> Result<()> {
    if !rate.is_finite() || !(0.0..=MAX_RATE).contains(&rate) {
        return Err(Error::Validation(format!(
            "Rate must be between 0 and {}",
            MAX_RATE
        )));
    }
    Ok(())
}
