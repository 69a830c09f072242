use actix_web::{HttpResponse, Responder};
use serde::{Deserialize, Serialize};

pub const SERVICE_NAME: &str = "Users API";

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct RootResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = RootResponse)
    )
)]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(RootResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
