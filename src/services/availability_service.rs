use bson::{doc, oid::ObjectId};
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::Client;

use crate::models::bookings::{Booking, BookingStatus};
use crate::models::schedule::{DayOfWeek, TrainerSchedule};

pub struct AvailabilityService;

impl AvailabilityService {
    /// Free recurring slots for one trainer on one calendar date: the
    /// trainer's template slots for that weekday, minus any slot whose start
    /// time is already taken by a non-cancelled booking on that date.
    ///
    /// Conflict is keyed on start-time equality only, not interval overlap.
    /// Schedule insertion order is preserved. An empty result is a normal
    /// outcome ("no slots available"), not an error.
    pub fn free_slots(
        date: NaiveDate,
        schedules: &[TrainerSchedule],
        bookings: &[Booking],
    ) -> Vec<TrainerSchedule> {
        let weekday = DayOfWeek::of(date);
        schedules
            .iter()
            .filter(|slot| slot.day_of_week == weekday)
            .filter(|slot| {
                !bookings.iter().any(|b| {
                    b.status != BookingStatus::Cancelled && b.start_time == Some(slot.start_time)
                })
            })
            .cloned()
            .collect()
    }

    /// Fetch the trainer's schedule and that date's bookings, then resolve.
    /// Always reads fresh; nothing is cached across trainer/date changes.
    pub async fn resolve(
        client: &Client,
        trainer_id: &ObjectId,
        date: NaiveDate,
    ) -> mongodb::error::Result<Vec<TrainerSchedule>> {
        let schedules: mongodb::Collection<TrainerSchedule> =
            client.database("ThaiKick").collection("TrainerSchedules");
        let bookings: mongodb::Collection<Booking> =
            client.database("ThaiKick").collection("Bookings");

        let slots: Vec<TrainerSchedule> = schedules
            .find(doc! { "trainer_id": *trainer_id })
            .await?
            .try_collect()
            .await?;

        let taken: Vec<Booking> = bookings
            .find(doc! {
                "trainer_id": *trainer_id,
                "date": date.to_string(),
                "status": { "$ne": "cancelled" },
            })
            .await?
            .try_collect()
            .await?;

        Ok(Self::free_slots(date, &slots, &taken))
    }
}
