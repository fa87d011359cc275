//! Application factory
//!
//! Builds the actix-web application around an already wired [`AppState`].

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use crate::middleware::auth::JwtAuth;
use crate::routes::auth::{
    login::login, logout::logout, me::me, refresh::refresh_token, validate, AppState,
};
use crate::routes::health::health_check;
use tt_shared::{error_codes, ErrorResponse};

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let jwt_auth = JwtAuth::new(app_state.auth_service.validator());

    App::new()
        .app_data(app_state)
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/auth")
                .route("/login", web::post().to(login))
                .route("/refresh_token", web::post().to(refresh_token))
                .route("/logout", web::post().to(logout))
                .service(
                    web::resource("/validate-token")
                        .app_data(validate::json_config())
                        .route(web::post().to(validate::validate_token)),
                )
                .service(web::resource("/me").wrap(jwt_auth).route(web::get().to(me))),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
