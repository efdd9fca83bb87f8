use actix_web::{web, HttpResponse, Responder};
use bson::DateTime;
use mongodb::{bson::doc, bson::oid::ObjectId, Client};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::affiliate::{AffiliateApplication, ApplicationStatus};
use crate::models::user::User;
use crate::services::affiliate_service::AffiliateService;

#[derive(Debug, Deserialize)]
pub struct ValidateCodeInput {
    pub code: String,
}

/// Public referral-code check used at checkout. An unknown or inactive code
/// is simply invalid, never an error.
pub async fn validate_code(
    data: web::Data<Arc<Client>>,
    input: web::Json<ValidateCodeInput>,
) -> impl Responder {
    let client = data.into_inner();

    match AffiliateService::validate_code(&client, &input.code).await {
        Ok(valid) => HttpResponse::Ok().json(json!({ "valid": valid })),
        Err(err) => {
            log::error!("Failed to validate referral code: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to validate code.")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplyInput {
    pub reason: String,
}

pub async fn apply(
    data: web::Data<Arc<Client>>,
    input: web::Json<ApplyInput>,
    user: AuthenticatedUser,
) -> impl Responder {
    let client = data.into_inner();

    let Ok(user_id) = ObjectId::parse_str(&user.user_id) else {
        return HttpResponse::BadRequest().body("Malformed user id");
    };

    let applications: mongodb::Collection<AffiliateApplication> =
        client.database("ThaiKick").collection("AffiliateApplications");

    // One open application per user
    match applications
        .find_one(doc! { "user_id": user_id, "status": "pending" })
        .await
    {
        Ok(Some(_)) => return HttpResponse::Conflict().body("Application already pending"),
        Ok(None) => {}
        Err(err) => {
            log::error!("Failed to check applications: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to check applications.");
        }
    }

    let application = AffiliateApplication {
        id: None,
        user_id,
        reason: input.into_inner().reason,
        status: ApplicationStatus::Pending,
        created_at: Some(DateTime::now()),
    };

    if let Err(err) = applications.insert_one(&application).await {
        log::error!("Failed to store application: {:?}", err);
        return HttpResponse::InternalServerError().body("Failed to store application.");
    }

    let users: mongodb::Collection<User> = client.database("ThaiKick").collection("Users");
    if let Err(err) = users
        .update_one(
            doc! { "_id": user_id },
            doc! { "$set": { "affiliate_status": "pending" } },
        )
        .await
    {
        log::error!("Failed to flag user as pending affiliate: {:?}", err);
    }

    HttpResponse::Created().body("Application submitted")
}
