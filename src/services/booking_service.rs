use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Client;
use thiserror::Error;

use crate::models::bookings::{Booking, BookingRequest, BookingStatus, BookingType};
use crate::models::course::Course;
use crate::models::gym::Gym;
use crate::services::affiliate_service::AffiliateService;
use crate::services::availability_service::AvailabilityService;
use crate::services::pricing_service::{BookingQuote, PricingService, QuoteError, QuoteParams, SessionSlot};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Invalid(#[from] QuoteError),
    #[error("malformed id")]
    MalformedId(#[from] bson::oid::Error),
    #[error("gym not found")]
    GymNotFound,
    #[error("trainer not found at this gym")]
    TrainerNotFound,
    #[error("course not found at this gym")]
    CourseNotFound,
    #[error("the selected time slot is no longer available")]
    SlotUnavailable,
    #[error("booking not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),
}

/// Fetched collaborator records a quote is computed against.
struct QuoteContext {
    gym: Gym,
    trainer_id: Option<ObjectId>,
    course: Option<Course>,
    referral_valid: bool,
}

pub struct BookingService;

impl BookingService {
    async fn load_context(client: &Client, req: &BookingRequest) -> Result<QuoteContext, BookingError> {
        let gyms: mongodb::Collection<Gym> = client.database("ThaiKick").collection("Gyms");

        let gym_id = ObjectId::parse_str(&req.gym_id)?;
        let gym = gyms
            .find_one(doc! { "_id": gym_id })
            .await?
            .ok_or(BookingError::GymNotFound)?;

        let trainer_id = match &req.trainer_id {
            Some(raw) => {
                let id = ObjectId::parse_str(raw)?;
                if gym.trainer(&id).is_none() {
                    return Err(BookingError::TrainerNotFound);
                }
                Some(id)
            }
            None => None,
        };

        let course = match &req.course_id {
            Some(raw) => {
                let id = ObjectId::parse_str(raw)?;
                let courses: mongodb::Collection<Course> =
                    client.database("ThaiKick").collection("Courses");
                let course = courses
                    .find_one(doc! { "_id": id, "gym_id": gym_id })
                    .await?
                    .ok_or(BookingError::CourseNotFound)?;
                Some(course)
            }
            None => None,
        };

        let referral_valid = match &req.referral_code {
            Some(code) => AffiliateService::validate_code(client, code).await?,
            None => false,
        };

        Ok(QuoteContext {
            gym,
            trainer_id,
            course,
            referral_valid,
        })
    }

    fn quote_in_context(ctx: &QuoteContext, req: &BookingRequest) -> Result<BookingQuote, BookingError> {
        let slot = match (req.start_time, req.end_time) {
            (Some(start), Some(end)) => Some(SessionSlot { start, end }),
            _ => None,
        };
        let trainer = ctx.trainer_id.as_ref().and_then(|id| ctx.gym.trainer(id));

        let quote = PricingService::quote(&QuoteParams {
            booking_type: req.booking_type,
            start_date: req.start_date,
            end_date: req.end_date,
            gym: &ctx.gym,
            trainer,
            course: ctx.course.as_ref(),
            slot,
            referral_code: req.referral_code.as_deref(),
            referral_code_valid: ctx.referral_valid,
        })?;
        Ok(quote)
    }

    /// Price a booking without persisting anything.
    pub async fn quote(client: &Client, req: &BookingRequest) -> Result<BookingQuote, BookingError> {
        let ctx = Self::load_context(client, req).await?;
        Self::quote_in_context(&ctx, req)
    }

    /// Confirm a booking: validate, re-resolve availability for private
    /// sessions, then insert one row per covered date inside a single
    /// transaction so a multi-date booking can never partially succeed.
    pub async fn create(
        client: &Client,
        user_id: ObjectId,
        req: &BookingRequest,
    ) -> Result<Vec<Booking>, BookingError> {
        let ctx = Self::load_context(client, req).await?;
        let quote = Self::quote_in_context(&ctx, req)?;

        // Stale slot data must not be trusted past a trainer/date change:
        // re-check the selected slot against current bookings right before
        // the insert. The check is keyed on the start date, matching how the
        // slot was offered.
        if req.booking_type == BookingType::Private {
            let trainer_id = ctx.trainer_id.as_ref().ok_or(QuoteError::MissingTrainer)?;
            let start = req.start_date.ok_or(QuoteError::MissingStartDate)?;
            let free = AvailabilityService::resolve(client, trainer_id, start).await?;
            let still_free = free.iter().any(|slot| {
                Some(slot.start_time) == req.start_time && Some(slot.end_time) == req.end_time
            });
            if !still_free {
                return Err(BookingError::SlotUnavailable);
            }
        }

        let gym_id = ctx.gym.id.ok_or(BookingError::GymNotFound)?;
        let now = DateTime::now();
        let rows: Vec<Booking> = quote
            .dates
            .iter()
            .map(|date| Booking {
                id: None,
                gym_id,
                user_id,
                date: *date,
                booking_type: req.booking_type,
                trainer_id: ctx.trainer_id,
                start_time: req.start_time,
                end_time: req.end_time,
                course_id: ctx.course.as_ref().and_then(|c| c.id),
                total_price: quote.row_price,
                commission_paid_to: quote.commission_paid_to.clone(),
                commission_amount: quote.commission_per_row,
                status: BookingStatus::Confirmed,
                created_at: Some(now),
            })
            .collect();

        let bookings: mongodb::Collection<Booking> =
            client.database("ThaiKick").collection("Bookings");

        let mut session = client.start_session().await?;
        session.start_transaction().await?;
        match bookings.insert_many(&rows).session(&mut session).await {
            Ok(_) => {
                session.commit_transaction().await?;
                log::info!(
                    "booked {} session(s) at gym {} for user {}",
                    rows.len(),
                    gym_id,
                    user_id
                );
                Ok(rows)
            }
            Err(err) => {
                let _ = session.abort_transaction().await;
                Err(err.into())
            }
        }
    }

    /// confirmed -> cancelled, restricted to the booking's owner.
    pub async fn cancel(client: &Client, booking_id: &ObjectId, user_id: &ObjectId) -> Result<(), BookingError> {
        Self::transition(client, doc! { "_id": *booking_id, "user_id": *user_id }, "cancelled").await
    }

    /// confirmed -> completed. Role gating happens at the route layer.
    pub async fn complete(client: &Client, booking_id: &ObjectId) -> Result<(), BookingError> {
        Self::transition(client, doc! { "_id": *booking_id }, "completed").await
    }

    async fn transition(
        client: &Client,
        mut filter: bson::Document,
        to: &str,
    ) -> Result<(), BookingError> {
        let bookings: mongodb::Collection<Booking> =
            client.database("ThaiKick").collection("Bookings");

        // Only confirmed bookings may transition; anything else matches nothing.
        filter.insert("status", "confirmed");
        let result = bookings
            .update_one(filter, doc! { "$set": { "status": to } })
            .await?;
        if result.matched_count == 0 {
            return Err(BookingError::NotFound);
        }
        Ok(())
    }
}
