use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::{bson::doc, bson::oid::ObjectId, Client};
use std::sync::Arc;

use crate::models::gym::Gym;

pub async fn get_gyms(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Gym> = client.database("ThaiKick").collection("Gyms");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Gym>>().await {
            Ok(gyms) => HttpResponse::Ok().json(gyms),
            Err(err) => {
                log::error!("Failed to collect gyms: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect gyms.")
            }
        },
        Err(err) => {
            log::error!("Failed to find gyms: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find gyms.")
        }
    }
}

pub async fn get_gym_by_id(data: web::Data<Arc<Client>>, path: web::Path<String>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Gym> = client.database("ThaiKick").collection("Gyms");

    let Ok(gym_id) = ObjectId::parse_str(path.as_str()) else {
        return HttpResponse::BadRequest().body("Invalid gym id");
    };

    match collection.find_one(doc! { "_id": gym_id }).await {
        Ok(Some(gym)) => HttpResponse::Ok().json(gym),
        Ok(None) => HttpResponse::NotFound().body("Gym not found"),
        Err(err) => {
            log::error!("Failed to fetch gym {}: {:?}", gym_id, err);
            HttpResponse::InternalServerError().body("Failed to fetch gym.")
        }
    }
}
