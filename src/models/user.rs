use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Owner,
    Customer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffiliateStatus {
    None,
    Pending,
    Active,
    Rejected,
}

impl Default for AffiliateStatus {
    fn default() -> Self {
        AffiliateStatus::None
    }
}

/// Platform user. Authentication itself is handled by the external identity
/// provider; this record carries the role and affiliate profile the API
/// needs for gating and referral-code validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub is_affiliate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_code: Option<String>,
    #[serde(default)]
    pub affiliate_status: AffiliateStatus,
}
