use actix_web::HttpResponse;

use crate::dto::auth::MeResponse;
use crate::middleware::auth::AuthContext;

/// Handler for GET /auth/me, behind [`JwtAuth`](crate::middleware::auth::JwtAuth)
pub async fn me(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        subject: auth.subject,
        roles: auth.roles,
    })
}
