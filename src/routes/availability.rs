use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use mongodb::{bson::oid::ObjectId, Client};
use serde::Deserialize;
use std::sync::Arc;

use crate::services::availability_service::AvailabilityService;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

/// Free weekly slots for a trainer on a specific calendar date. Resolved
/// fresh on every call; an empty list means "no slots available", not an
/// error.
pub async fn get_trainer_availability(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    query: web::Query<AvailabilityQuery>,
) -> impl Responder {
    let client = data.into_inner();

    let Ok(trainer_id) = ObjectId::parse_str(path.as_str()) else {
        return HttpResponse::BadRequest().body("Invalid trainer id");
    };

    match AvailabilityService::resolve(&client, &trainer_id, query.date).await {
        Ok(slots) => HttpResponse::Ok().json(slots),
        Err(err) => {
            log::error!(
                "Failed to resolve availability for trainer {}: {:?}",
                trainer_id,
                err
            );
            HttpResponse::InternalServerError().body("Failed to resolve availability.")
        }
    }
}
