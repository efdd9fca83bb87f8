use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::{bson::doc, bson::oid::ObjectId, Client};
use std::sync::Arc;

use crate::models::course::Course;

/// Active courses offered by one gym. Inactive courses are never bookable,
/// so they are filtered at the query.
pub async fn get_gym_courses(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Course> = client.database("ThaiKick").collection("Courses");

    let Ok(gym_id) = ObjectId::parse_str(path.as_str()) else {
        return HttpResponse::BadRequest().body("Invalid gym id");
    };

    match collection
        .find(doc! { "gym_id": gym_id, "is_active": true })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<Course>>().await {
            Ok(courses) => HttpResponse::Ok().json(courses),
            Err(err) => {
                log::error!("Failed to collect courses: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect courses.")
            }
        },
        Err(err) => {
            log::error!("Failed to find courses: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find courses.")
        }
    }
}
