use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use thaikick_api::db;
use thaikick_api::middleware::{auth::AuthMiddleware, role_auth::RequireRole};
use thaikick_api::models::user::UserRole;
use thaikick_api::routes;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(web::Data::new(client.clone()))
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    // Public catalog and availability reads
                    .route("/gyms", web::get().to(routes::gym::get_gyms))
                    .route("/gyms/{id}", web::get().to(routes::gym::get_gym_by_id))
                    .route(
                        "/gyms/{id}/courses",
                        web::get().to(routes::course::get_gym_courses),
                    )
                    .route(
                        "/trainers/{id}/availability",
                        web::get().to(routes::availability::get_trainer_availability),
                    )
                    .service(
                        web::scope("/affiliate")
                            .route(
                                "/validate-code",
                                web::post().to(routes::affiliate::validate_code),
                            )
                            .service(
                                web::scope("")
                                    .wrap(AuthMiddleware)
                                    .route("/apply", web::post().to(routes::affiliate::apply)),
                            ),
                    )
                    .service(
                        web::scope("/bookings")
                            .wrap(AuthMiddleware)
                            .route("/quote", web::post().to(routes::booking::quote_booking))
                            .route("", web::post().to(routes::booking::create_booking))
                            .route(
                                "/{id}/cancel",
                                web::put().to(routes::booking::cancel_booking),
                            )
                            .service(
                                web::scope("")
                                    .wrap(RequireRole::new(UserRole::Owner))
                                    .route(
                                        "/{id}/complete",
                                        web::put().to(routes::booking::complete_booking),
                                    ),
                            ),
                    )
                    .service(
                        web::scope("/account")
                            .wrap(AuthMiddleware)
                            .route(
                                "/{id}/bookings",
                                web::get().to(routes::booking::get_user_bookings),
                            ),
                    )
                    .service(
                        web::scope("/admin")
                            .wrap(RequireRole::new(UserRole::Admin))
                            .wrap(AuthMiddleware)
                            .route(
                                "/affiliate/applications",
                                web::get().to(routes::admin::list_affiliate_applications),
                            )
                            .route(
                                "/affiliate/applications/{id}",
                                web::put().to(routes::admin::review_affiliate_application),
                            ),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
