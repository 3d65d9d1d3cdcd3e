//! Inbound onboarding events and their outcomes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::users_model::UserStatus;
use crate::errors::{Error, Result, ValidationError};

/// A provider event that can move a user through onboarding.
///
/// Every variant carries the provider application id used to find the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    ApplicationApproved {
        application_id: String,
    },
    ApplicationDenied {
        application_id: String,
    },
    ApplicationAwaitingDocuments {
        application_id: String,
    },
    ApplicationPendingReview {
        application_id: String,
    },
    CustomerCreated {
        application_id: String,
        customer_id: String,
        /// Provider timestamp of the event, stable across redeliveries.
        created_at: DateTime<Utc>,
    },
    DocumentApproved {
        application_id: String,
    },
    Unrecognized {
        event_type: String,
    },
}

fn required_str(payload: &Value, field: &str) -> Result<String> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ValidationError::MissingField(field.to_string()).into())
}

impl LifecycleEvent {
    /// Builds an event from its type name and a flat payload of the form
    /// `{"applicationId": .., "customerId": .., "createdAt": ..}`.
    ///
    /// Unknown event types yield `Unrecognized` rather than an error.
    pub fn from_parts(event_type: &str, payload: &Value) -> Result<Self> {
        let event = match event_type {
            "application.approved" => LifecycleEvent::ApplicationApproved {
                application_id: required_str(payload, "applicationId")?,
            },
            "application.denied" => LifecycleEvent::ApplicationDenied {
                application_id: required_str(payload, "applicationId")?,
            },
            "application.awaitingDocuments" => LifecycleEvent::ApplicationAwaitingDocuments {
                application_id: required_str(payload, "applicationId")?,
            },
            "application.pendingReview" => LifecycleEvent::ApplicationPendingReview {
                application_id: required_str(payload, "applicationId")?,
            },
            "customer.created" => {
                let created_at = required_str(payload, "createdAt")?;
                let created_at = DateTime::parse_from_rfc3339(&created_at)
                    .map_err(Error::from)?
                    .with_timezone(&Utc);
                LifecycleEvent::CustomerCreated {
                    application_id: required_str(payload, "applicationId")?,
                    customer_id: required_str(payload, "customerId")?,
                    created_at,
                }
            }
            "document.approved" => LifecycleEvent::DocumentApproved {
                application_id: required_str(payload, "applicationId")?,
            },
            other => LifecycleEvent::Unrecognized {
                event_type: other.to_string(),
            },
        };
        Ok(event)
    }

    pub fn event_type(&self) -> &str {
        match self {
            LifecycleEvent::ApplicationApproved { .. } => "application.approved",
            LifecycleEvent::ApplicationDenied { .. } => "application.denied",
            LifecycleEvent::ApplicationAwaitingDocuments { .. } => "application.awaitingDocuments",
            LifecycleEvent::ApplicationPendingReview { .. } => "application.pendingReview",
            LifecycleEvent::CustomerCreated { .. } => "customer.created",
            LifecycleEvent::DocumentApproved { .. } => "document.approved",
            LifecycleEvent::Unrecognized { event_type } => event_type,
        }
    }

    pub fn application_id(&self) -> Option<&str> {
        match self {
            LifecycleEvent::ApplicationApproved { application_id }
            | LifecycleEvent::ApplicationDenied { application_id }
            | LifecycleEvent::ApplicationAwaitingDocuments { application_id }
            | LifecycleEvent::ApplicationPendingReview { application_id }
            | LifecycleEvent::CustomerCreated { application_id, .. }
            | LifecycleEvent::DocumentApproved { application_id } => Some(application_id),
            LifecycleEvent::Unrecognized { .. } => None,
        }
    }

    /// Status a plain application event sets, if it is one.
    pub(crate) fn target_status(&self) -> Option<UserStatus> {
        match self {
            LifecycleEvent::ApplicationApproved { .. } => Some(UserStatus::Approved),
            LifecycleEvent::ApplicationDenied { .. } => Some(UserStatus::Denied),
            LifecycleEvent::ApplicationAwaitingDocuments { .. } => {
                Some(UserStatus::AwaitingDocuments)
            }
            LifecycleEvent::ApplicationPendingReview { .. } => Some(UserStatus::PendingReview),
            _ => None,
        }
    }
}

/// What applying one lifecycle event did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum LifecycleOutcome {
    #[serde(rename_all = "camelCase")]
    StatusChanged { user_id: String, status: UserStatus },
    #[serde(rename_all = "camelCase")]
    AccountProvisioned { user_id: String, account_id: String },
    #[serde(rename_all = "camelCase")]
    NoMatchingUser { application_id: String },
    Informational,
    #[serde(rename_all = "camelCase")]
    Unrecognized { event_type: String },
}
