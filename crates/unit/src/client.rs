//! Unit API client.
//!
//! Implements the core `PaymentGatewayTrait` over the Unit REST endpoints.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use nestegg_core::payments::{
    CreditRequest, DebitRequest, DepositAccountRequest, PaymentGatewayTrait,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::config::UnitConfig;
use crate::error::{Result, UnitError};
use crate::types::*;

const JSON_API: &str = "application/vnd.api+json";

/// Client for the Unit banking API.
#[derive(Debug, Clone)]
pub struct UnitClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    deposit_product: String,
}

impl UnitClient {
    pub fn new(config: &UnitConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
            deposit_product: config.deposit_product.clone(),
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_API));
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| UnitError::invalid_request("Invalid API token format"))?;
        headers.insert(AUTHORIZATION, auth_value);
        Ok(headers)
    }

    /// Parses a JSON:API response body, mapping error documents to `UnitError::Api`.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!("Unit response ({})", status);

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|e| e.message())
                .unwrap_or_else(|| format!("Request failed: {}", body));
            return Err(UnitError::api(status.as_u16(), message));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to deserialize Unit response: {}", e);
            UnitError::api(status.as_u16(), format!("Failed to parse response: {}", e))
        })
    }

    async fn post<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<CreatedResource> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(body)
            .send()
            .await?;

        let document: Document<CreatedResource> = Self::parse_response(response).await?;
        Ok(document.data)
    }

    /// POST /payments
    pub async fn create_ach_payment(&self, payment: CreateAchPayment) -> Result<String> {
        debug!(
            "Creating {:?} ACH payment of {} cents",
            payment.attributes.direction, payment.attributes.amount
        );
        let created = self.post("/payments", &Document { data: payment }).await?;
        Ok(created.id)
    }

    /// POST /accounts
    pub async fn open_deposit_account(&self, account: CreateDepositAccount) -> Result<String> {
        let created = self.post("/accounts", &Document { data: account }).await?;
        Ok(created.id)
    }

    pub fn debit_payment(request: &DebitRequest) -> Result<CreateAchPayment> {
        ach_payment(
            AchDirection::Debit,
            request.amount,
            &request.destination_account_id,
            &request.source_token,
            &request.description,
            &request.idempotency_key,
            &request.tags,
        )
    }

    pub fn credit_payment(request: &CreditRequest) -> Result<CreateAchPayment> {
        ach_payment(
            AchDirection::Credit,
            request.amount,
            &request.source_account_id,
            &request.destination_token,
            &request.description,
            &request.idempotency_key,
            &request.tags,
        )
    }

    pub fn deposit_account(&self, request: &DepositAccountRequest) -> CreateDepositAccount {
        CreateDepositAccount {
            kind: "depositAccount".to_string(),
            attributes: DepositAccountAttributes {
                deposit_product: self.deposit_product.clone(),
                idempotency_key: request.idempotency_key.clone(),
                tags: request.tags.clone(),
            },
            relationships: DepositAccountRelationships {
                customer: Relationship::to("customer", &request.customer_id),
            },
        }
    }
}

/// Builds an ACH payment against a Plaid-linked counterparty. `Debit` pulls
/// from the counterparty into `account_id`, `Credit` pushes out of it.
fn ach_payment(
    direction: AchDirection,
    amount: i64,
    account_id: &str,
    processor_token: &str,
    description: &str,
    idempotency_key: &str,
    tags: &std::collections::BTreeMap<String, String>,
) -> Result<CreateAchPayment> {
    if amount <= 0 {
        return Err(UnitError::invalid_request(format!(
            "Payment amount must be positive, got {}",
            amount
        )));
    }
    Ok(CreateAchPayment {
        kind: "achPayment".to_string(),
        attributes: AchPaymentAttributes {
            amount,
            direction,
            plaid_processor_token: processor_token.to_string(),
            description: description.to_string(),
            idempotency_key: idempotency_key.to_string(),
            tags: tags.clone(),
        },
        relationships: AchPaymentRelationships {
            account: Relationship::to("depositAccount", account_id),
        },
    })
}

#[async_trait]
impl PaymentGatewayTrait for UnitClient {
    async fn create_debit(&self, request: &DebitRequest) -> nestegg_core::Result<String> {
        let payment = Self::debit_payment(request)?;
        Ok(self.create_ach_payment(payment).await?)
    }

    async fn create_credit(&self, request: &CreditRequest) -> nestegg_core::Result<String> {
        let payment = Self::credit_payment(request)?;
        Ok(self.create_ach_payment(payment).await?)
    }

    async fn create_deposit_account(
        &self,
        request: &DepositAccountRequest,
    ) -> nestegg_core::Result<String> {
        let account = self.deposit_account(request);
        Ok(self.open_deposit_account(account).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn config() -> UnitConfig {
        UnitConfig {
            api_url: "https://api.s.unit.sh/".to_string(),
            api_token: "token".to_string(),
            timeout_secs: 5,
            deposit_product: "checking".to_string(),
        }
    }

    fn tags() -> BTreeMap<String, String> {
        BTreeMap::from([("goalId".to_string(), "g1".to_string())])
    }

    #[test]
    fn debit_body_pulls_from_processor_token_into_account() {
        let request = DebitRequest {
            amount: 2550,
            source_token: "processor-abc".to_string(),
            destination_account_id: "10001".to_string(),
            description: "Savings".to_string(),
            idempotency_key: "key-1".to_string(),
            tags: tags(),
        };

        let body = Document {
            data: UnitClient::debit_payment(&request).unwrap(),
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "data": {
                    "type": "achPayment",
                    "attributes": {
                        "amount": 2550,
                        "direction": "Debit",
                        "plaidProcessorToken": "processor-abc",
                        "description": "Savings",
                        "idempotencyKey": "key-1",
                        "tags": { "goalId": "g1" }
                    },
                    "relationships": {
                        "account": { "data": { "type": "depositAccount", "id": "10001" } }
                    }
                }
            })
        );
    }

    #[test]
    fn credit_body_pushes_from_account_to_processor_token() {
        let request = CreditRequest {
            amount: 50_000,
            source_account_id: "10001".to_string(),
            destination_token: "processor-xyz".to_string(),
            description: "Withdrawal".to_string(),
            idempotency_key: "batch-1".to_string(),
            tags: tags(),
        };

        let payment = UnitClient::credit_payment(&request).unwrap();

        assert_eq!(payment.attributes.direction, AchDirection::Credit);
        assert_eq!(payment.attributes.plaid_processor_token, "processor-xyz");
        assert_eq!(payment.relationships.account.data.id, "10001");
    }

    #[test]
    fn rejects_non_positive_amounts() {
        let request = DebitRequest {
            amount: 0,
            source_token: "processor-abc".to_string(),
            destination_account_id: "10001".to_string(),
            description: "Savings".to_string(),
            idempotency_key: "key-1".to_string(),
            tags: BTreeMap::new(),
        };
        assert!(matches!(
            UnitClient::debit_payment(&request),
            Err(UnitError::InvalidRequest(_))
        ));
    }

    #[test]
    fn deposit_account_body_uses_configured_product() {
        let client = UnitClient::new(&config()).unwrap();
        assert_eq!(client.base_url, "https://api.s.unit.sh");

        let body = client.deposit_account(&DepositAccountRequest {
            customer_id: "c-1".to_string(),
            idempotency_key: "k".to_string(),
            tags: BTreeMap::from([("userId".to_string(), "u1".to_string())]),
        });

        assert_eq!(
            serde_json::to_value(Document { data: body }).unwrap(),
            json!({
                "data": {
                    "type": "depositAccount",
                    "attributes": {
                        "depositProduct": "checking",
                        "idempotencyKey": "k",
                        "tags": { "userId": "u1" }
                    },
                    "relationships": {
                        "customer": { "data": { "type": "customer", "id": "c-1" } }
                    }
                }
            })
        );
    }

    #[test]
    fn decodes_created_resource_and_error_documents() {
        let created: Document<CreatedResource> =
            serde_json::from_str(r#"{"data":{"type":"achPayment","id":"42","attributes":{}}}"#)
                .unwrap();
        assert_eq!(created.data.id, "42");

        let errors: ApiErrorResponse = serde_json::from_str(
            r#"{"errors":[{"title":"Bad Request","detail":"amount is invalid","status":"400"}]}"#,
        )
        .unwrap();
        assert_eq!(
            errors.message().as_deref(),
            Some("Bad Request: amount is invalid")
        );
    }

    #[test]
    fn adapter_errors_become_gateway_errors() {
        let err: nestegg_core::Error = UnitError::api(422, "invalid token").into();
        assert!(matches!(
            err,
            nestegg_core::Error::Gateway(nestegg_core::errors::GatewayError::Api { status: 422, .. })
        ));
    }
}
