use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::{bson::doc, bson::oid::ObjectId, Client};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::models::affiliate::AffiliateApplication;
use crate::models::user::User;
use crate::services::affiliate_service::AffiliateService;

pub async fn list_affiliate_applications(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let applications: mongodb::Collection<AffiliateApplication> =
        client.database("ThaiKick").collection("AffiliateApplications");

    match applications.find(doc! { "status": "pending" }).await {
        Ok(cursor) => match cursor.try_collect::<Vec<AffiliateApplication>>().await {
            Ok(pending) => HttpResponse::Ok().json(pending),
            Err(err) => {
                log::error!("Failed to collect applications: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect applications.")
            }
        },
        Err(err) => {
            log::error!("Failed to find applications: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find applications.")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewInput {
    pub approve: bool,
}

/// Approve or reject a pending application. Approval activates the user's
/// affiliate profile and assigns a freshly generated referral code.
pub async fn review_affiliate_application(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<ReviewInput>,
) -> impl Responder {
    let client = data.into_inner();

    let Ok(application_id) = ObjectId::parse_str(path.as_str()) else {
        return HttpResponse::BadRequest().body("Invalid application id");
    };

    let applications: mongodb::Collection<AffiliateApplication> =
        client.database("ThaiKick").collection("AffiliateApplications");

    let application = match applications
        .find_one(doc! { "_id": application_id, "status": "pending" })
        .await
    {
        Ok(Some(application)) => application,
        Ok(None) => return HttpResponse::NotFound().body("Pending application not found"),
        Err(err) => {
            log::error!("Failed to fetch application: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch application.");
        }
    };

    let users: mongodb::Collection<User> = client.database("ThaiKick").collection("Users");
    let user = match users.find_one(doc! { "_id": application.user_id }).await {
        Ok(Some(user)) => user,
        Ok(None) => return HttpResponse::NotFound().body("Applicant not found"),
        Err(err) => {
            log::error!("Failed to fetch applicant: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch applicant.");
        }
    };

    let (application_status, user_update) = if input.approve {
        let code = AffiliateService::generate_code(&user.name);
        (
            "approved",
            doc! { "$set": {
                "is_affiliate": true,
                "affiliate_status": "active",
                "affiliate_code": code,
            }},
        )
    } else {
        (
            "rejected",
            doc! { "$set": { "is_affiliate": false, "affiliate_status": "rejected" } },
        )
    };

    if let Err(err) = applications
        .update_one(
            doc! { "_id": application_id },
            doc! { "$set": { "status": application_status } },
        )
        .await
    {
        log::error!("Failed to update application: {:?}", err);
        return HttpResponse::InternalServerError().body("Failed to update application.");
    }

    if let Err(err) = users
        .update_one(doc! { "_id": application.user_id }, user_update)
        .await
    {
        log::error!("Failed to update applicant: {:?}", err);
        return HttpResponse::InternalServerError().body("Failed to update applicant.");
    }

    HttpResponse::Ok().json(json!({ "status": application_status }))
}
