use bson::{oid::ObjectId, DateTime};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::money::Money;
use crate::models::schedule::TimeOfDay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    /// Daily-rate booking spanning a contiguous date range, one unit per day.
    Standard,
    /// Trainer-scoped booking recurring weekly on the same weekday/time.
    Private,
    /// Single flat-priced enrollment, date-range-independent.
    Course,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Completed,
    Cancelled,
}

/// One persisted booking row. Recurring bookings materialize as one row per
/// covered calendar date; a course booking is always exactly one row.
///
/// Rows are created at checkout confirmation and never mutated afterwards
/// except for status transitions (confirmed -> completed | cancelled).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub gym_id: ObjectId,
    pub user_id: ObjectId,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub booking_type: BookingType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer_id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<ObjectId>,
    /// Price for this one date/unit, not the whole booking.
    pub total_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_paid_to: Option<String>,
    pub commission_amount: Money,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
}

/// Checkout payload as submitted by the client. Everything optional here is
/// validated by the pricing engine before any row is built.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub gym_id: String,
    #[serde(rename = "type")]
    pub booking_type: BookingType,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub trainer_id: Option<String>,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    pub course_id: Option<String>,
    pub referral_code: Option<String>,
}
