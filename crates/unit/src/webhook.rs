//! Webhook decoding and dispatch.
//!
//! A Unit delivery carries a batch of events. Each is decoded into a core
//! event and applied independently, in delivery order.

use std::sync::Arc;

use log::{debug, error, warn};
use nestegg_core::payments::{PaymentEvent, PaymentEventKind, PaymentStatusServiceTrait};
use nestegg_core::users::{AccountLifecycleServiceTrait, LifecycleEvent};
use serde_json::json;

use crate::error::{Result, UnitError};
use crate::types::{WebhookEnvelope, WebhookEventObject};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    Lifecycle(LifecycleEvent),
    Payment(PaymentEvent),
    Ignored { event_type: String },
}

fn decode_event(event: &WebhookEventObject) -> Result<WebhookEvent> {
    if let Some(kind) = PaymentEventKind::from_event_type(&event.event_type) {
        let payment_id = event.related_id("payment").ok_or_else(|| {
            UnitError::InvalidWebhook(format!("event {} has no payment relationship", event.id))
        })?;
        return Ok(WebhookEvent::Payment(PaymentEvent {
            payment_id: payment_id.to_string(),
            kind,
        }));
    }

    let payload = json!({
        "applicationId": event.related_id("application"),
        "customerId": event.related_id("customer"),
        "createdAt": event.attributes.created_at.map(|t| t.to_rfc3339()),
    });
    let lifecycle = LifecycleEvent::from_parts(&event.event_type, &payload)
        .map_err(|e| UnitError::InvalidWebhook(format!("event {}: {}", event.id, e)))?;

    Ok(match lifecycle {
        LifecycleEvent::Unrecognized { event_type } => WebhookEvent::Ignored { event_type },
        other => WebhookEvent::Lifecycle(other),
    })
}

/// Decodes a webhook body into events, preserving delivery order.
///
/// Only an unparseable envelope fails the whole body. Each event decodes on
/// its own, so one malformed event leaves the others intact.
pub fn decode_webhook(body: &str) -> Result<Vec<Result<WebhookEvent>>> {
    let envelope: WebhookEnvelope = serde_json::from_str(body)?;
    Ok(envelope.data.iter().map(decode_event).collect())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookSummary {
    pub applied: usize,
    pub ignored: usize,
    pub failed: usize,
}

/// Routes decoded webhook events to the core services.
pub struct WebhookDispatcher {
    lifecycle: Arc<dyn AccountLifecycleServiceTrait>,
    payments: Arc<dyn PaymentStatusServiceTrait>,
}

impl WebhookDispatcher {
    pub fn new(
        lifecycle: Arc<dyn AccountLifecycleServiceTrait>,
        payments: Arc<dyn PaymentStatusServiceTrait>,
    ) -> Self {
        Self {
            lifecycle,
            payments,
        }
    }

    /// Applies every event of a delivery. One event failing does not stop
    /// the rest; redelivery is left to the provider.
    pub async fn dispatch(&self, body: &str) -> Result<WebhookSummary> {
        let events = decode_webhook(body)?;
        let mut summary = WebhookSummary::default();

        for event in events {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    error!("Skipping undecodable webhook event: {}", e);
                    summary.failed += 1;
                    continue;
                }
            };
            let outcome = match event {
                WebhookEvent::Lifecycle(event) => {
                    let event_type = event.event_type().to_string();
                    self.lifecycle
                        .apply_event(event)
                        .await
                        .map(|outcome| debug!("{} -> {:?}", event_type, outcome))
                        .map_err(|e| (event_type, e))
                }
                WebhookEvent::Payment(event) => self
                    .payments
                    .apply_payment_event(&event)
                    .await
                    .map(|outcome| debug!("payment {} -> {:?}", event.payment_id, outcome))
                    .map_err(|e| (event.payment_id.clone(), e)),
                WebhookEvent::Ignored { event_type } => {
                    debug!("Ignoring webhook event '{}'", event_type);
                    summary.ignored += 1;
                    continue;
                }
            };

            match outcome {
                Ok(()) => summary.applied += 1,
                Err((subject, e)) => {
                    error!("Webhook event for {} failed: {}", subject, e);
                    summary.failed += 1;
                }
            }
        }

        if summary.failed > 0 {
            warn!(
                "Webhook delivery finished with {} failed of {} events",
                summary.failed,
                summary.applied + summary.failed + summary.ignored
            );
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use nestegg_core::payments::PaymentEventOutcome;
    use nestegg_core::users::LifecycleOutcome;
    use std::sync::Mutex;

    const DELIVERY: &str = r#"{
        "data": [
            {
                "id": "1",
                "type": "application.awaitingDocuments",
                "attributes": { "createdAt": "2024-04-02T10:00:00.000Z", "tags": {} },
                "relationships": {
                    "application": { "data": { "type": "individualApplication", "id": "app-1" } }
                }
            },
            {
                "id": "2",
                "type": "customer.created",
                "attributes": { "createdAt": "2024-04-02T12:00:00.000Z" },
                "relationships": {
                    "application": { "data": { "type": "individualApplication", "id": "app-1" } },
                    "customer": { "data": { "type": "individualCustomer", "id": "cust-7" } }
                }
            },
            {
                "id": "3",
                "type": "payment.sent",
                "attributes": { "createdAt": "2024-04-03T09:00:00.000Z" },
                "relationships": {
                    "payment": { "data": { "type": "achPayment", "id": "pay-5" } },
                    "account": { "data": { "type": "depositAccount", "id": "acct-1" } }
                }
            },
            {
                "id": "4",
                "type": "account.created",
                "attributes": { "createdAt": "2024-04-03T09:00:00.000Z" },
                "relationships": {}
            }
        ]
    }"#;

    #[test]
    fn decodes_a_mixed_delivery_in_order() {
        let events = decode_webhook(DELIVERY)
            .unwrap()
            .into_iter()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(
            events,
            vec![
                WebhookEvent::Lifecycle(LifecycleEvent::ApplicationAwaitingDocuments {
                    application_id: "app-1".to_string()
                }),
                WebhookEvent::Lifecycle(LifecycleEvent::CustomerCreated {
                    application_id: "app-1".to_string(),
                    customer_id: "cust-7".to_string(),
                    created_at: Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap(),
                }),
                WebhookEvent::Payment(PaymentEvent {
                    payment_id: "pay-5".to_string(),
                    kind: PaymentEventKind::Sent,
                }),
                WebhookEvent::Ignored {
                    event_type: "account.created".to_string()
                },
            ]
        );
    }

    #[test]
    fn lifecycle_event_without_application_is_invalid() {
        let body = r#"{"data":[{"id":"9","type":"application.denied","relationships":{}}]}"#;
        let events = decode_webhook(body).unwrap();
        assert!(matches!(
            events.as_slice(),
            [Err(UnitError::InvalidWebhook(_))]
        ));
    }

    #[derive(Default)]
    struct RecordingLifecycle {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AccountLifecycleServiceTrait for RecordingLifecycle {
        async fn apply_event(
            &self,
            event: LifecycleEvent,
        ) -> nestegg_core::Result<LifecycleOutcome> {
            self.seen.lock().unwrap().push(event.event_type().to_string());
            if matches!(event, LifecycleEvent::CustomerCreated { .. }) {
                return Err(nestegg_core::Error::Unexpected("gateway down".to_string()));
            }
            Ok(LifecycleOutcome::Informational)
        }

        async fn apply_lifecycle_event(
            &self,
            _event_type: &str,
            _payload: &serde_json::Value,
        ) -> nestegg_core::Result<LifecycleOutcome> {
            unimplemented!()
        }
    }

    #[derive(Default)]
    struct RecordingPayments {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PaymentStatusServiceTrait for RecordingPayments {
        async fn apply_payment_event(
            &self,
            event: &PaymentEvent,
        ) -> nestegg_core::Result<PaymentEventOutcome> {
            self.seen.lock().unwrap().push(event.payment_id.clone());
            Ok(PaymentEventOutcome::default())
        }
    }

    #[tokio::test]
    async fn dispatch_continues_past_a_failing_event() {
        let lifecycle = Arc::new(RecordingLifecycle::default());
        let payments = Arc::new(RecordingPayments::default());
        let dispatcher = WebhookDispatcher::new(lifecycle.clone(), payments.clone());

        let summary = dispatcher.dispatch(DELIVERY).await.unwrap();

        assert_eq!(
            summary,
            WebhookSummary {
                applied: 2,
                ignored: 1,
                failed: 1
            }
        );
        assert_eq!(
            *lifecycle.seen.lock().unwrap(),
            vec!["application.awaitingDocuments", "customer.created"]
        );
        assert_eq!(*payments.seen.lock().unwrap(), vec!["pay-5"]);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let dispatcher = WebhookDispatcher::new(
            Arc::new(RecordingLifecycle::default()),
            Arc::new(RecordingPayments::default()),
        );
        assert!(matches!(
            dispatcher.dispatch("not json").await,
            Err(UnitError::Json(_))
        ));
    }

    #[tokio::test]
    async fn malformed_event_does_not_drop_the_rest_of_the_delivery() {
        let body = r#"{
            "data": [
                {
                    "id": "1",
                    "type": "application.approved",
                    "attributes": { "createdAt": "2024-04-02T10:00:00.000Z" },
                    "relationships": {
                        "application": { "data": { "type": "individualApplication", "id": "app-1" } }
                    }
                },
                { "id": "2", "type": "application.denied", "relationships": {} }
            ]
        }"#;
        let lifecycle = Arc::new(RecordingLifecycle::default());
        let dispatcher =
            WebhookDispatcher::new(lifecycle.clone(), Arc::new(RecordingPayments::default()));

        let summary = dispatcher.dispatch(body).await.unwrap();

        assert_eq!(
            summary,
            WebhookSummary {
                applied: 1,
                ignored: 0,
                failed: 1
            }
        );
        assert_eq!(
            *lifecycle.seen.lock().unwrap(),
            vec!["application.approved"]
        );
    }
}
