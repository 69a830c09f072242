pub mod auth;
pub mod root;
pub mod swagger;
pub mod users;

use crate::middleware::AuthMiddleware;
use actix_web::web;

/// Rotas da API, compartilhadas entre `main` e os testes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root::root))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login)),
        )
        // Todas as rotas de /users exigem bearer token
        .service(
            web::scope("/users")
                .wrap(AuthMiddleware)
                .route("/me", web::get().to(users::get_me))
                .route("/{id}", web::put().to(users::update_user))
                .route("/{id}/status", web::patch().to(users::patch_status)),
        );
}
