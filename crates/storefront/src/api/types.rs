//! Wire types for the Samovar REST backend.
//!
//! Every response uses the `{ success, data?, error? }` envelope. Raw JSON
//! lacking a `success` field is auto-wrapped as a success carrying the raw
//! value; any other shape is a hard error rather than guessed at.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use samovar_core::{BranchId, FulfillmentMode, UserId};

use super::ApiError;

/// The backend response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The remote user profile, which mirrors the delivery preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Redeemable bonus points.
    #[serde(default)]
    pub bonus_balance: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_type: Option<FulfillmentMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_branch_id: Option<BranchId>,
    /// Monotonic preference version; see `DeliveryPreference::version`.
    #[serde(default)]
    pub preference_version: u64,
}

/// Partial profile update for `PUT /profile/`.
///
/// Absent fields are left untouched server-side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_type: Option<FulfillmentMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_branch_id: Option<BranchId>,
    pub preference_version: u64,
}

/// Payload for `POST /addresses/`; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub street: String,
    pub building: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intercom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Decode a response body against the envelope contract.
///
/// - An object with a `success` field is the typed envelope: `success:
///   false` maps to [`ApiError::Api`], `success: true` requires `data`
///   matching `T`.
/// - Any other JSON is auto-wrapped: it must itself deserialize as `T`.
///
/// Shape mismatches are hard [`ApiError::UnexpectedShape`] errors; there is
/// no `results`-vs-`data`-vs-raw-array guessing.
pub(crate) fn decode_envelope<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, ApiError> {
    let value: Value = serde_json::from_str(raw)?;

    if value.as_object().is_some_and(|m| m.contains_key("success")) {
        let envelope: Envelope = serde_json::from_value(value)
            .map_err(|e| ApiError::UnexpectedShape(format!("malformed envelope: {e}")))?;
        if !envelope.success {
            return Err(ApiError::Api(
                envelope.error.unwrap_or_else(|| "unknown error".to_owned()),
            ));
        }
        let data = envelope
            .data
            .ok_or_else(|| ApiError::UnexpectedShape("success envelope with no data".to_owned()))?;
        return serde_json::from_value(data)
            .map_err(|e| ApiError::UnexpectedShape(format!("envelope data mismatch: {e}")));
    }

    // Auto-wrap: raw JSON without a `success` field is treated as the data.
    serde_json::from_value(value)
        .map_err(|e| ApiError::UnexpectedShape(format!("response shape mismatch: {e}")))
}

/// Decode a mutation acknowledgement that may carry no data (e.g. DELETE).
pub(crate) fn decode_ack(raw: &str) -> Result<(), ApiError> {
    if raw.trim().is_empty() {
        return Ok(());
    }
    let value: Value = serde_json::from_str(raw)?;
    if value.as_object().is_some_and(|m| m.contains_key("success")) {
        let envelope: Envelope = serde_json::from_value(value)
            .map_err(|e| ApiError::UnexpectedShape(format!("malformed envelope: {e}")))?;
        if !envelope.success {
            return Err(ApiError::Api(
                envelope.error.unwrap_or_else(|| "unknown error".to_owned()),
            ));
        }
    }
    Ok(())
}
