use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::catalog::{check_allowed, SortScope, SORT_DIRECTIONS};
use crate::error::{Error, Result};

/// One sort key; serializes to the `{"property": .., "direction": ..}` shape
/// the stats API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub property: String,
    pub direction: String,
}

impl SortSpec {
    pub fn new(property: impl Into<String>, direction: impl AsRef<str>) -> Self {
        Self {
            property: property.into(),
            direction: direction.as_ref().to_ascii_uppercase(),
        }
    }

    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(property, "ASC")
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(property, "DESC")
    }

    pub fn is_descending(&self) -> bool {
        self.direction == "DESC"
    }

    /// Pairs parallel field and direction lists. Lengths must agree.
    pub fn zip(properties: &[&str], directions: &[&str]) -> Result<Vec<Self>> {
        if properties.len() != directions.len() {
            return Err(Error::validation(format!(
                "{} sort fields but {} directions",
                properties.len(),
                directions.len()
            )));
        }
        Ok(properties
            .iter()
            .zip(directions)
            .map(|(p, d)| SortSpec::new(*p, d))
            .collect())
    }
}

/// `points`, `points:desc` or `points:ASC`; the direction defaults to ASC.
impl FromStr for SortSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (property, direction) = s.split_once(':').unwrap_or((s, "ASC"));
        if property.is_empty() {
            return Err(Error::validation(format!("empty sort field in '{}'", s)));
        }
        Ok(SortSpec::new(property, direction))
    }
}

/// Directions must be ASC or DESC; fields are checked against `scope` when one is known.
pub fn validate_sort(specs: &[SortSpec], scope: Option<SortScope>) -> Result<()> {
    for spec in specs {
        check_allowed("sort direction", &spec.direction, SORT_DIRECTIONS)?;
        if let Some(scope) = scope {
            if !scope.allows(&spec.property) {
                return Err(Error::validation(format!(
                    "invalid sort field '{}'; valid fields: {}",
                    spec.property,
                    scope.fields().join(", ")
                )));
            }
        }
    }
    Ok(())
}

/// JSON value of the `sort` parameter, keys in priority order.
pub fn sort_param(specs: &[SortSpec]) -> Result<String> {
    Ok(serde_json::to_string(specs)?)
}
