//! Response bodies returned by the send endpoint.

use serde::{Deserialize, Serialize};

/// JSON envelope returned by `/v2/email/send`.
///
/// The API answers HTTP 200 with `success: false` for some rejected sends, so
/// callers that care should inspect this rather than rely on the status alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    /// Whether the API accepted the message.
    pub success: bool,
    /// Identifiers of the accepted message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SendData>,
    /// Reason for a rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Identifiers assigned to an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendData {
    /// Transaction identifier.
    #[serde(default)]
    pub transactionid: Option<String>,
    /// Message identifier.
    #[serde(default)]
    pub messageid: Option<String>,
}
