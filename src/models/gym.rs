use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::money::Money;

/// A trainer offering private sessions. Trainers are embedded in their gym
/// document; a gym exclusively owns its trainer list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trainer {
    pub id: ObjectId,
    pub name: String,
    pub specialty: String,
    /// Additive surcharge on top of the gym base price for private sessions.
    pub price_per_session: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gym {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub location: String,
    /// Price for one standard session.
    pub base_price: Money,
    pub is_flash_sale: bool,
    /// Percent (0-100) off the base price while the flash sale runs.
    pub flash_sale_discount: u8,
    /// Percent (0-100) of the session price credited to a valid referrer.
    pub affiliate_percentage: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<ObjectId>,
    #[serde(default)]
    pub trainers: Vec<Trainer>,
}

impl Gym {
    pub fn trainer(&self, trainer_id: &ObjectId) -> Option<&Trainer> {
        self.trainers.iter().find(|t| &t.id == trainer_id)
    }
}
