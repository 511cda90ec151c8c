use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::messages;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Name,
    Email,
    Platform,
}

impl FieldName {
    pub const COLLECTION_ORDER: [FieldName; 3] = [Self::Name, Self::Email, Self::Platform];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Platform => "platform",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Name => messages::ASK_NAME,
            Self::Email => messages::ASK_EMAIL,
            Self::Platform => messages::ASK_PLATFORM,
        }
    }

    /// Returns the trimmed value to store, or the reason it was rejected.
    pub fn validate(&self, raw: &str) -> Result<String, DomainError> {
        let value = raw.trim();
        match self {
            Self::Email if !is_valid_email(value) => {
                Err(DomainError::InvalidEmail(value.to_string()))
            }
            _ if value.is_empty() => Err(DomainError::EmptyField { field: *self }),
            _ => Ok(value.to_string()),
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permissive check: something, `@`, something, `.`, something. Surrounding
/// whitespace is stripped before matching.
pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value.trim())
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("email pattern is a valid literal regex")
    })
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedLead {
    pub name: String,
    pub email: String,
    pub platform: String,
}

/// Fields collected so far in the current funnel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    name: Option<String>,
    email: Option<String>,
    platform: Option<String>,
}

pub enum LeadProgress {
    Missing { record: LeadRecord, next: FieldName },
    Complete(CompletedLead),
}

impl LeadRecord {
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.slot(field).is_some()
    }

    pub fn insert(&mut self, field: FieldName, value: impl Into<String>) {
        let slot = match field {
            FieldName::Name => &mut self.name,
            FieldName::Email => &mut self.email,
            FieldName::Platform => &mut self.platform,
        };
        *slot = Some(value.into());
    }

    pub fn len(&self) -> usize {
        FieldName::COLLECTION_ORDER.iter().filter(|field| self.contains(**field)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collected fields in collection order.
    pub fn entries(&self) -> impl Iterator<Item = (FieldName, &str)> + '_ {
        FieldName::COLLECTION_ORDER
            .into_iter()
            .filter_map(move |field| self.get(field).map(|value| (field, value)))
    }

    pub fn next_missing_field(&self) -> Option<FieldName> {
        FieldName::COLLECTION_ORDER.into_iter().find(|field| !self.contains(*field))
    }

    pub fn into_progress(self) -> LeadProgress {
        match (self.name, self.email, self.platform) {
            (Some(name), Some(email), Some(platform)) => {
                LeadProgress::Complete(CompletedLead { name, email, platform })
            }
            (name, email, platform) => {
                let next = if name.is_none() {
                    FieldName::Name
                } else if email.is_none() {
                    FieldName::Email
                } else {
                    FieldName::Platform
                };
                LeadProgress::Missing { record: Self { name, email, platform }, next }
            }
        }
    }

    fn slot(&self, field: FieldName) -> &Option<String> {
        match field {
            FieldName::Name => &self.name,
            FieldName::Email => &self.email,
            FieldName::Platform => &self.platform,
        }
    }
}
