pub mod auth_service;
pub mod provider;
pub mod supabase;
pub mod user_service;

#[cfg(test)]
pub mod testing;

pub use provider::AppState;
pub use supabase::SupabaseClient;
