use async_trait::async_trait;

use super::transfers_model::{TransferBackRequest, TransferBackResult};
use crate::errors::Result;

#[async_trait]
pub trait TransferBackServiceTrait: Send + Sync {
    /// Sends one external credit for `request.total_amount` and records each
    /// goal's share on that goal.
    ///
    /// All validation happens before the credit is issued. A failure after
    /// the credit succeeded is reported as `Error::PartialPersistence`.
    async fn reconcile_batch(
        &self,
        user_id: &str,
        request: TransferBackRequest,
    ) -> Result<TransferBackResult>;
}
