use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::{bson::doc, bson::oid::ObjectId, Client};
use serde_json::json;
use std::sync::Arc;

use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::bookings::{Booking, BookingRequest};
use crate::services::booking_service::{BookingError, BookingService};

/// Map a booking failure onto a response. Validation problems carry their
/// message; persistence failures surface a generic retryable body without
/// internal detail.
fn error_response(err: BookingError) -> HttpResponse {
    match err {
        BookingError::Invalid(e) => HttpResponse::BadRequest().body(e.to_string()),
        BookingError::MalformedId(_) => HttpResponse::BadRequest().body("Malformed id"),
        BookingError::GymNotFound
        | BookingError::TrainerNotFound
        | BookingError::CourseNotFound
        | BookingError::NotFound => HttpResponse::NotFound().body(err.to_string()),
        BookingError::SlotUnavailable => HttpResponse::Conflict().body(err.to_string()),
        BookingError::Database(e) => {
            log::error!("Booking persistence failure: {:?}", e);
            HttpResponse::InternalServerError().body("Something went wrong. Please try again.")
        }
    }
}

pub async fn quote_booking(
    data: web::Data<Arc<Client>>,
    input: web::Json<BookingRequest>,
    _user: AuthenticatedUser,
) -> impl Responder {
    let client = data.into_inner();

    match BookingService::quote(&client, &input).await {
        Ok(quote) => HttpResponse::Ok().json(quote),
        Err(err) => error_response(err),
    }
}

pub async fn create_booking(
    data: web::Data<Arc<Client>>,
    input: web::Json<BookingRequest>,
    user: AuthenticatedUser,
) -> impl Responder {
    let client = data.into_inner();

    let Ok(user_id) = ObjectId::parse_str(&user.user_id) else {
        return HttpResponse::BadRequest().body("Malformed user id");
    };

    match BookingService::create(&client, user_id, &input).await {
        Ok(rows) => HttpResponse::Created().json(json!({
            "sessions": rows.len(),
            "bookings": rows,
        })),
        Err(err) => error_response(err),
    }
}

pub async fn get_user_bookings(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    user: AuthenticatedUser,
) -> impl Responder {
    let user_id = path.into_inner();
    if user_id != user.user_id {
        return HttpResponse::Forbidden().body("Forbidden");
    }

    let Ok(user_id) = ObjectId::parse_str(&user_id) else {
        return HttpResponse::BadRequest().body("Malformed user id");
    };

    let client = data.into_inner();
    let collection: mongodb::Collection<Booking> =
        client.database("ThaiKick").collection("Bookings");

    match collection.find(doc! { "user_id": user_id }).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Booking>>().await {
            Ok(bookings) => HttpResponse::Ok().json(bookings),
            Err(err) => {
                log::error!("Failed to collect bookings: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect bookings.")
            }
        },
        Err(err) => {
            log::error!("Failed to find bookings: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find bookings.")
        }
    }
}

pub async fn cancel_booking(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    user: AuthenticatedUser,
) -> impl Responder {
    let client = data.into_inner();

    let Ok(booking_id) = ObjectId::parse_str(path.as_str()) else {
        return HttpResponse::BadRequest().body("Invalid booking id");
    };
    let Ok(user_id) = ObjectId::parse_str(&user.user_id) else {
        return HttpResponse::BadRequest().body("Malformed user id");
    };

    match BookingService::cancel(&client, &booking_id, &user_id).await {
        Ok(()) => HttpResponse::Ok().body("Booking cancelled"),
        Err(err) => error_response(err),
    }
}

pub async fn complete_booking(data: web::Data<Arc<Client>>, path: web::Path<String>) -> impl Responder {
    let client = data.into_inner();

    let Ok(booking_id) = ObjectId::parse_str(path.as_str()) else {
        return HttpResponse::BadRequest().body("Invalid booking id");
    };

    match BookingService::complete(&client, &booking_id).await {
        Ok(()) => HttpResponse::Ok().body("Booking completed"),
        Err(err) => error_response(err),
    }
}
