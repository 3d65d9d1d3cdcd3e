//! Unit API wire types (JSON:API documents).

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level JSON:API document wrapping a single resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document<T> {
    pub data: T,
}

/// `{ "type": .., "id": .. }` reference to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub data: ResourceIdentifier,
}

impl Relationship {
    pub fn to(kind: &str, id: &str) -> Self {
        Self {
            data: ResourceIdentifier {
                kind: kind.to_string(),
                id: id.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AchDirection {
    Debit,
    Credit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchPaymentAttributes {
    /// Cents.
    pub amount: i64,
    pub direction: AchDirection,
    pub plaid_processor_token: String,
    pub description: String,
    pub idempotency_key: String,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchPaymentRelationships {
    pub account: Relationship,
}

/// `achPayment` against a Plaid-linked counterparty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAchPayment {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: AchPaymentAttributes,
    pub relationships: AchPaymentRelationships,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAccountAttributes {
    pub deposit_product: String,
    pub idempotency_key: String,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositAccountRelationships {
    pub customer: Relationship,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDepositAccount {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: DepositAccountAttributes,
    pub relationships: DepositAccountRelationships,
}

/// The part of any created resource the adapter needs.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResource {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorObject {
    pub title: Option<String>,
    pub detail: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub errors: Vec<ApiErrorObject>,
}

impl ApiErrorResponse {
    /// Joins the error titles/details into one message.
    pub fn message(&self) -> Option<String> {
        let parts: Vec<String> = self
            .errors
            .iter()
            .filter_map(|e| match (&e.title, &e.detail) {
                (Some(title), Some(detail)) => Some(format!("{}: {}", title, detail)),
                (Some(title), None) => Some(title.clone()),
                (None, Some(detail)) => Some(detail.clone()),
                (None, None) => None,
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEventAttributes {
    pub created_at: Option<DateTime<Utc>>,
}

/// One event inside a webhook delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventObject {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub attributes: WebhookEventAttributes,
    /// Kept loose: some relationships carry arrays or extra members.
    #[serde(default)]
    pub relationships: HashMap<String, serde_json::Value>,
}

impl WebhookEventObject {
    pub fn related_id(&self, name: &str) -> Option<&str> {
        self.relationships.get(name)?.get("data")?.get("id")?.as_str()
    }
}

/// A webhook delivery: a batch of events, in order.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    pub data: Vec<WebhookEventObject>,
}
