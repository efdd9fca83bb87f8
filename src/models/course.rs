use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::money::Money;

/// A flat-priced enrollment offered by a gym. A course is a single
/// purchasable unit; its price does not depend on any date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub gym_id: ObjectId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Money,
    /// Only active courses are bookable.
    pub is_active: bool,
}
