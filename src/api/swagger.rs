use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users API",
        version = "1.0.0",
        description = "User registration, login and profile management on top of Supabase Auth and PostgREST.\n\n**Authentication:** `/users` endpoints require the `Authorization: Bearer <access_token>` header returned by `/auth/login`."
    ),
    paths(
        crate::api::root::root,

        // Auth endpoints
        crate::api::auth::register,
        crate::api::auth::login,

        // Users
        crate::api::users::update_user,
        crate::api::users::get_me,
        crate::api::users::patch_status,
    ),
    components(
        schemas(
            crate::api::root::RootResponse,

            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterResponse,
            crate::services::auth_service::LoginResponse,

            crate::services::user_service::UpdateUserRequest,
            crate::services::user_service::StatusPatchRequest,
            crate::services::user_service::UserMessageResponse,

            crate::models::UserRecord,
            crate::models::UserStatus,

            crate::utils::error::ErrorDetail,
            crate::utils::error::ValidationErrorResponse,
            crate::utils::error::FieldViolation,
        )
    ),
    tags(
        (name = "Health", description = "Service liveness."),
        (name = "Auth", description = "Registration and password login, delegated to the identity provider."),
        (name = "Users", description = "Profile read/update and admin-only status changes."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Supabase access token"))
                        .build()
                ),
            );
        }
    }
}
