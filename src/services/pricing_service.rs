use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::models::bookings::BookingType;
use crate::models::course::Course;
use crate::models::gym::{Gym, Trainer};
use crate::models::money::Money;
use crate::models::schedule::TimeOfDay;

/// The time range copied from a schedule slot onto a private booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSlot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// Everything the pricing computation reads. The referral code and its
/// validity are explicit parameters; there is no ambient referral state.
#[derive(Debug, Clone)]
pub struct QuoteParams<'a> {
    pub booking_type: BookingType,
    pub start_date: Option<NaiveDate>,
    /// Defaults to `start_date` when absent.
    pub end_date: Option<NaiveDate>,
    pub gym: &'a Gym,
    pub trainer: Option<&'a Trainer>,
    pub course: Option<&'a Course>,
    pub slot: Option<SessionSlot>,
    pub referral_code: Option<&'a str>,
    pub referral_code_valid: bool,
}

/// Deterministic result of a quote: the dates the booking materializes into
/// and the prices attached to each persisted row.
///
/// `total` is rounded once on the aggregate; `row_price` is the evenly
/// divided per-row amount, rounded independently. The sum of row prices may
/// therefore drift from `total` by a few currency units. That discrepancy is
/// accepted behavior and asserted in tests.
#[derive(Debug, Clone, Serialize)]
pub struct BookingQuote {
    pub dates: Vec<NaiveDate>,
    pub total: Money,
    pub row_price: Money,
    pub commission_per_row: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_paid_to: Option<String>,
}

impl BookingQuote {
    pub fn session_count(&self) -> usize {
        self.dates.len()
    }
}

/// Rejected user input. Surfaced before any price or date computation and
/// before any persistence attempt; non-retryable without input correction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("a start date is required")]
    MissingStartDate,
    #[error("end date cannot be before start date")]
    EndBeforeStart,
    #[error("a trainer is required for private sessions")]
    MissingTrainer,
    #[error("a time slot is required for private sessions")]
    MissingTimeSlot,
    #[error("a course selection is required")]
    MissingCourse,
    #[error("this course is not open for enrollment")]
    InactiveCourse,
}

pub struct PricingService;

impl PricingService {
    /// Expand a validated date range into the ordered session dates it
    /// covers: every day for standard bookings, every seventh day for
    /// private (weekly recurrence). Callers must have rejected
    /// `end < start` already.
    pub fn expand_dates(booking_type: BookingType, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        match booking_type {
            BookingType::Course => vec![start],
            BookingType::Standard => start.iter_days().take_while(|d| *d <= end).collect(),
            BookingType::Private => start.iter_weeks().take_while(|d| *d <= end).collect(),
        }
    }

    /// Price of one standard or private session, before any rounding.
    /// Flash-sale discount applies to the gym base price; the trainer
    /// surcharge is added after the discount.
    fn per_session_price(gym: &Gym, trainer: Option<&Trainer>) -> f64 {
        let mut price = gym.base_price.as_f64();
        if gym.is_flash_sale {
            price *= 1.0 - f64::from(gym.flash_sale_discount) / 100.0;
        }
        if let Some(trainer) = trainer {
            price += trainer.price_per_session.as_f64();
        }
        price
    }

    /// Compute the full quote: session dates, aggregate total, per-row price
    /// and per-row commission. Pure; the caller persists the rows.
    pub fn quote(params: &QuoteParams<'_>) -> Result<BookingQuote, QuoteError> {
        let start = params.start_date.ok_or(QuoteError::MissingStartDate)?;

        let (dates, total) = match params.booking_type {
            BookingType::Course => {
                let course = params.course.ok_or(QuoteError::MissingCourse)?;
                if !course.is_active {
                    return Err(QuoteError::InactiveCourse);
                }
                // A course is a single purchasable unit regardless of end date.
                (vec![start], course.price)
            }
            BookingType::Standard | BookingType::Private => {
                let end = params.end_date.unwrap_or(start);
                if end < start {
                    return Err(QuoteError::EndBeforeStart);
                }
                let trainer = match params.booking_type {
                    BookingType::Private => {
                        if params.slot.is_none() {
                            return Err(QuoteError::MissingTimeSlot);
                        }
                        Some(params.trainer.ok_or(QuoteError::MissingTrainer)?)
                    }
                    _ => None,
                };

                let dates = Self::expand_dates(params.booking_type, start, end);
                let per_session = Self::per_session_price(params.gym, trainer);
                // Round the aggregate once, not each session, to avoid
                // cumulative rounding drift.
                let total = Money::round(per_session * dates.len() as f64);
                (dates, total)
            }
        };

        let row_price = Money::round(total.as_f64() / dates.len() as f64);

        let commission_per_row = match (params.referral_code, params.referral_code_valid) {
            (Some(code), true) if !code.is_empty() => {
                Money::round(row_price.as_f64() * f64::from(params.gym.affiliate_percentage) / 100.0)
            }
            _ => Money::ZERO,
        };
        let commission_paid_to = if commission_per_row.is_zero() {
            None
        } else {
            params.referral_code.map(str::to_owned)
        };

        Ok(BookingQuote {
            dates,
            total,
            row_price,
            commission_per_row,
            commission_paid_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    fn gym(base: i64, flash: bool, discount: u8, affiliate: u8) -> Gym {
        Gym {
            id: Some(ObjectId::new()),
            name: "Lumpinee Test Gym".to_string(),
            location: "Bangkok".to_string(),
            base_price: Money::baht(base),
            is_flash_sale: flash,
            flash_sale_discount: discount,
            affiliate_percentage: affiliate,
            owner_id: None,
            trainers: vec![],
        }
    }

    fn trainer(surcharge: i64) -> Trainer {
        Trainer {
            id: ObjectId::new(),
            name: "Kru Somchai".to_string(),
            specialty: "Clinch".to_string(),
            price_per_session: Money::baht(surcharge),
        }
    }

    fn course(price: i64, active: bool) -> Course {
        Course {
            id: Some(ObjectId::new()),
            gym_id: ObjectId::new(),
            title: "Beginner Camp".to_string(),
            description: None,
            price: Money::baht(price),
            is_active: active,
        }
    }

    fn slot() -> SessionSlot {
        SessionSlot {
            start: "09:00".parse().unwrap(),
            end: "10:00".parse().unwrap(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn standard_expands_every_day_inclusive() {
        let d0 = date(2025, 6, 2);
        let dates = PricingService::expand_dates(BookingType::Standard, d0, d0 + chrono::Days::new(6));
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], d0);
        assert_eq!(dates[6], d0 + chrono::Days::new(6));
    }

    #[test]
    fn private_expands_weekly() {
        let d0 = date(2025, 6, 2);
        let dates = PricingService::expand_dates(BookingType::Private, d0, d0 + chrono::Days::new(14));
        assert_eq!(
            dates,
            vec![d0, d0 + chrono::Days::new(7), d0 + chrono::Days::new(14)]
        );
    }

    #[test]
    fn private_partial_week_does_not_add_a_session() {
        let d0 = date(2025, 6, 2);
        // 13 days out: the second week has not completed a third occurrence.
        let dates = PricingService::expand_dates(BookingType::Private, d0, d0 + chrono::Days::new(13));
        assert_eq!(dates.len(), 2);
    }

    #[test]
    fn course_is_a_single_unit_regardless_of_range() {
        let g = gym(500, false, 0, 0);
        let c = course(4500, true);
        let q = PricingService::quote(&QuoteParams {
            booking_type: BookingType::Course,
            start_date: Some(date(2025, 6, 2)),
            end_date: Some(date(2025, 8, 30)),
            gym: &g,
            trainer: None,
            course: Some(&c),
            slot: None,
            referral_code: None,
            referral_code_valid: false,
        })
        .unwrap();
        assert_eq!(q.session_count(), 1);
        assert_eq!(q.total, Money::baht(4500));
        assert_eq!(q.row_price, Money::baht(4500));
    }

    #[test]
    fn flash_sale_discounts_the_base_price() {
        let g = gym(500, true, 20, 0);
        let q = PricingService::quote(&QuoteParams {
            booking_type: BookingType::Standard,
            start_date: Some(date(2025, 6, 2)),
            end_date: Some(date(2025, 6, 4)),
            gym: &g,
            trainer: None,
            course: None,
            slot: None,
            referral_code: None,
            referral_code_valid: false,
        })
        .unwrap();
        // 500 * 0.8 = 400/session, 3 sessions
        assert_eq!(q.total, Money::baht(1200));
        assert_eq!(q.row_price, Money::baht(400));
    }

    #[test]
    fn trainer_surcharge_applies_after_the_discount() {
        let g = gym(500, true, 20, 0);
        let t = trainer(300);
        let q = PricingService::quote(&QuoteParams {
            booking_type: BookingType::Private,
            start_date: Some(date(2025, 6, 2)),
            end_date: None,
            gym: &g,
            trainer: Some(&t),
            course: None,
            slot: Some(slot()),
            referral_code: None,
            referral_code_valid: false,
        })
        .unwrap();
        // 400 + 300 = 700 for the single session
        assert_eq!(q.session_count(), 1);
        assert_eq!(q.total, Money::baht(700));
    }

    #[test]
    fn commission_requires_a_validated_code() {
        let g = gym(500, true, 20, 10);
        let base = QuoteParams {
            booking_type: BookingType::Standard,
            start_date: Some(date(2025, 6, 2)),
            end_date: Some(date(2025, 6, 4)),
            gym: &g,
            trainer: None,
            course: None,
            slot: None,
            referral_code: Some("KRU-PAIR"),
            referral_code_valid: true,
        };

        let q = PricingService::quote(&base).unwrap();
        assert_eq!(q.commission_per_row, Money::baht(40)); // 10% of 400
        assert_eq!(q.commission_paid_to.as_deref(), Some("KRU-PAIR"));

        let invalid = QuoteParams {
            referral_code_valid: false,
            ..base.clone()
        };
        let q = PricingService::quote(&invalid).unwrap();
        assert_eq!(q.commission_per_row, Money::ZERO);
        assert!(q.commission_paid_to.is_none());

        let absent = QuoteParams {
            referral_code: None,
            referral_code_valid: true,
            ..base
        };
        let q = PricingService::quote(&absent).unwrap();
        assert_eq!(q.commission_per_row, Money::ZERO);
        assert!(q.commission_paid_to.is_none());
    }

    #[test]
    fn zero_affiliate_percentage_pays_nobody() {
        let g = gym(500, false, 0, 0);
        let q = PricingService::quote(&QuoteParams {
            booking_type: BookingType::Standard,
            start_date: Some(date(2025, 6, 2)),
            end_date: None,
            gym: &g,
            trainer: None,
            course: None,
            slot: None,
            referral_code: Some("KRU-PAIR"),
            referral_code_valid: true,
        })
        .unwrap();
        assert_eq!(q.commission_per_row, Money::ZERO);
        assert!(q.commission_paid_to.is_none());
    }

    #[test]
    fn end_before_start_is_rejected_before_any_computation() {
        let g = gym(500, false, 0, 0);
        for booking_type in [BookingType::Standard, BookingType::Private] {
            let t = trainer(300);
            let err = PricingService::quote(&QuoteParams {
                booking_type,
                start_date: Some(date(2025, 6, 10)),
                end_date: Some(date(2025, 6, 2)),
                gym: &g,
                trainer: Some(&t),
                course: None,
                slot: Some(slot()),
                referral_code: None,
                referral_code_valid: false,
            })
            .unwrap_err();
            assert_eq!(err, QuoteError::EndBeforeStart);
        }
    }

    #[test]
    fn missing_inputs_are_rejected() {
        let g = gym(500, false, 0, 0);
        let t = trainer(300);

        let err = PricingService::quote(&QuoteParams {
            booking_type: BookingType::Standard,
            start_date: None,
            end_date: None,
            gym: &g,
            trainer: None,
            course: None,
            slot: None,
            referral_code: None,
            referral_code_valid: false,
        })
        .unwrap_err();
        assert_eq!(err, QuoteError::MissingStartDate);

        let err = PricingService::quote(&QuoteParams {
            booking_type: BookingType::Private,
            start_date: Some(date(2025, 6, 2)),
            end_date: None,
            gym: &g,
            trainer: Some(&t),
            course: None,
            slot: None,
            referral_code: None,
            referral_code_valid: false,
        })
        .unwrap_err();
        assert_eq!(err, QuoteError::MissingTimeSlot);

        let err = PricingService::quote(&QuoteParams {
            booking_type: BookingType::Private,
            start_date: Some(date(2025, 6, 2)),
            end_date: None,
            gym: &g,
            trainer: None,
            course: None,
            slot: Some(slot()),
            referral_code: None,
            referral_code_valid: false,
        })
        .unwrap_err();
        assert_eq!(err, QuoteError::MissingTrainer);

        let err = PricingService::quote(&QuoteParams {
            booking_type: BookingType::Course,
            start_date: Some(date(2025, 6, 2)),
            end_date: None,
            gym: &g,
            trainer: None,
            course: None,
            slot: None,
            referral_code: None,
            referral_code_valid: false,
        })
        .unwrap_err();
        assert_eq!(err, QuoteError::MissingCourse);

        let inactive = course(4500, false);
        let err = PricingService::quote(&QuoteParams {
            booking_type: BookingType::Course,
            start_date: Some(date(2025, 6, 2)),
            end_date: None,
            gym: &g,
            trainer: None,
            course: Some(&inactive),
            slot: None,
            referral_code: None,
            referral_code_valid: false,
        })
        .unwrap_err();
        assert_eq!(err, QuoteError::InactiveCourse);
    }

    #[test]
    fn row_prices_may_drift_from_the_aggregate_total() {
        // 335 * 0.9 = 301.5/session; 2 sessions -> total 603, rows 302 each.
        // The 1-baht drift between 2*302 and 603 is accepted behavior.
        let g = gym(335, true, 10, 0);
        let q = PricingService::quote(&QuoteParams {
            booking_type: BookingType::Standard,
            start_date: Some(date(2025, 6, 2)),
            end_date: Some(date(2025, 6, 3)),
            gym: &g,
            trainer: None,
            course: None,
            slot: None,
            referral_code: None,
            referral_code_valid: false,
        })
        .unwrap();
        assert_eq!(q.total, Money::baht(603));
        assert_eq!(q.row_price, Money::baht(302));
        let row_sum: i64 = (0..q.session_count()).map(|_| q.row_price.amount()).sum();
        assert_eq!(row_sum, 604);
        assert_ne!(row_sum, q.total.amount());
    }

    #[test]
    fn two_week_private_with_flash_sale_and_referral() {
        let g = gym(500, true, 20, 10);
        let t = trainer(300);
        let d0 = date(2025, 6, 2);
        let q = PricingService::quote(&QuoteParams {
            booking_type: BookingType::Private,
            start_date: Some(d0),
            end_date: Some(d0 + chrono::Days::new(7)),
            gym: &g,
            trainer: Some(&t),
            course: None,
            slot: Some(slot()),
            referral_code: Some("KRU-PAIR"),
            referral_code_valid: true,
        })
        .unwrap();

        assert_eq!(q.dates, vec![d0, d0 + chrono::Days::new(7)]);
        assert_eq!(q.total, Money::baht(1400)); // 700 * 2
        assert_eq!(q.row_price, Money::baht(700));
        assert_eq!(q.commission_per_row, Money::baht(70));
        assert_eq!(q.commission_paid_to.as_deref(), Some("KRU-PAIR"));
    }
}
