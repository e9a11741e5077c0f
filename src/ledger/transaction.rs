use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::period::{shift_month, shift_year};

/// How often a transaction repeats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceFrequency {
    /// The date one recurrence step after `from`. `None` is the identity.
    /// Monthly and yearly steps clamp the day to the target month length,
    /// so Feb 29 + yearly lands on Feb 28 in non-leap years.
    pub fn next_date(&self, from: NaiveDate) -> NaiveDate {
        match self {
            RecurrenceFrequency::None => from,
            RecurrenceFrequency::Daily => from + chrono::Duration::days(1),
            RecurrenceFrequency::Weekly => from + chrono::Duration::days(7),
            RecurrenceFrequency::Monthly => shift_month(from, 1),
            RecurrenceFrequency::Yearly => shift_year(from, 1),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, RecurrenceFrequency::None)
    }
}

/// Canonical structured recurrence shape. The store historically also held a
/// bare frequency string; that legacy shape is upgraded on deserialize.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: RecurrenceFrequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_generated: Option<NaiveDate>,
}

impl RecurrenceRule {
    pub fn new(frequency: RecurrenceFrequency) -> Self {
        Self {
            frequency,
            end_date: None,
            is_active: true,
            last_generated: None,
        }
    }

    /// Next occurrence strictly governed by this rule: `None` when the rule
    /// is inactive, has no frequency, or the computed date falls past
    /// `end_date`. Nothing here materializes transactions; callers own the
    /// `next_occurrence` bookkeeping.
    pub fn next_after(&self, from: NaiveDate) -> Option<NaiveDate> {
        if !self.is_active || self.frequency.is_none() {
            return None;
        }
        let candidate = self.frequency.next_date(from);
        match self.end_date {
            Some(end) if candidate > end => None,
            _ => Some(candidate),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecurrenceInput {
    Flat(RecurrenceFrequency),
    Structured {
        frequency: RecurrenceFrequency,
        #[serde(default)]
        end_date: Option<NaiveDate>,
        #[serde(default = "default_true")]
        is_active: bool,
        #[serde(default)]
        last_generated: Option<NaiveDate>,
    },
}

fn default_true() -> bool {
    true
}

impl<'de> Deserialize<'de> for RecurrenceRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match RecurrenceInput::deserialize(deserializer)? {
            RecurrenceInput::Flat(frequency) => RecurrenceRule::new(frequency),
            RecurrenceInput::Structured {
                frequency,
                end_date,
                is_active,
                last_generated,
            } => RecurrenceRule {
                frequency,
                end_date,
                is_active,
                last_generated,
            },
        })
    }
}

/// The unit of record. `amount` is a non-negative magnitude; the sign is
/// implied by the category's type. `category_id` may reference an unknown
/// category, which aggregation degrades gracefully.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub category_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_occurrence: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_transaction_id: Option<String>,
}

impl Transaction {
    pub fn new(
        amount: f64,
        category_id: impl Into<String>,
        date: NaiveDate,
        note: impl Into<String>,
    ) -> Self {
        Self {
            id: fresh_id(),
            amount,
            category_id: category_id.into(),
            date,
            note: note.into(),
            recurrence: None,
            next_occurrence: None,
            parent_transaction_id: None,
        }
    }

    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.next_occurrence = rule.next_after(self.date);
        self.recurrence = Some(rule);
        self
    }
}

/// Globally unique transaction id.
pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}
