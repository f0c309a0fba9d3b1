//! Types for budget categories and transactions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::tags;
use crate::error::Result;
use crate::timestamp::Timestamp;

/// Kind of spending a category tracks. Wire values are the backend's French
/// names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetCategoryType {
    #[serde(rename = "alimentation")]
    Food,
    #[serde(rename = "transport")]
    Transport,
    #[serde(rename = "logement")]
    Housing,
    #[serde(rename = "loisirs")]
    Leisure,
    #[serde(rename = "santé")]
    Health,
    #[serde(rename = "vêtements")]
    Clothing,
    #[serde(rename = "éducation")]
    Education,
    #[serde(rename = "épargne")]
    Savings,
    #[serde(rename = "autre")]
    Other,
}

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

/// A budget category. The spending figures are computed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: i64,
    pub name: String,
    pub category_type: BudgetCategoryType,
    pub monthly_budget: f64,
    pub color: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user_id: i64,
    pub spent_this_month: f64,
    pub remaining_budget: f64,
    pub budget_percentage_used: f64,
}

/// Fields accepted when creating a category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBudgetCategory {
    pub name: String,
    pub category_type: BudgetCategoryType,
    pub monthly_budget: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewBudgetCategory {
    pub fn new(name: &str, category_type: BudgetCategoryType, monthly_budget: f64) -> Self {
        Self {
            name: name.to_string(),
            category_type,
            monthly_budget,
            color: None,
            icon: None,
            description: None,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Partial category update; unset fields are not sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetCategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_type: Option<BudgetCategoryType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_budget: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// A budget transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetTransaction {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub transaction_date: Timestamp,
    pub receipt_url: Option<String>,
    /// Raw stored form, tags joined with `", "`
    pub tags: Option<String>,
    pub is_recurring: bool,
    pub recurring_interval: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user_id: i64,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub tags_list: Vec<String>,
}

impl BudgetTransaction {
    /// Tags as a list, preferring the server's split over the raw string
    pub fn tag_list(&self) -> Vec<String> {
        if !self.tags_list.is_empty() {
            return self.tags_list.clone();
        }
        self.tags.as_deref().map(tags::split).unwrap_or_default()
    }
}

/// Fields accepted when recording a transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBudgetTransaction {
    pub title: String,
    pub amount: f64,
    pub transaction_type: TransactionType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_interval: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

impl NewBudgetTransaction {
    pub fn new(title: &str, amount: f64, transaction_type: TransactionType) -> Self {
        Self {
            title: title.to_string(),
            amount,
            transaction_type,
            description: None,
            transaction_date: None,
            receipt_url: None,
            tags: None,
            is_recurring: None,
            recurring_interval: None,
            category_id: None,
        }
    }

    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.transaction_date = Some(date);
        self
    }

    /// Attach tags; fails if a tag cannot be stored unambiguously
    pub fn with_tags<S: AsRef<str>>(mut self, tag_list: &[S]) -> Result<Self> {
        self.tags = Some(tags::join(tag_list)?);
        Ok(self)
    }

    pub fn recurring(mut self, interval: &str) -> Self {
        self.is_recurring = Some(true);
        self.recurring_interval = Some(interval.to_string());
        self
    }
}

/// Partial transaction update; unset fields are not sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetTransactionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_interval: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

/// Server-side filters for `GET /budget/transactions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TransactionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl TransactionFilter {
    pub fn category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    /// Inclusive date range
    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn page(mut self, skip: u32, limit: u32) -> Self {
        self.skip = Some(skip);
        self.limit = Some(limit);
        self
    }
}

/// Budget totals for the current month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetOverview {
    pub total_budget: f64,
    pub total_spent: f64,
    pub remaining_budget: f64,
    pub categories: Vec<BudgetCategory>,
}
