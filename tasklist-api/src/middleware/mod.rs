/// Middleware modules for the API server
///
/// Bearer authentication lives in `tasklist_shared::auth::middleware`; this
/// module holds the HTTP hardening that only the server needs.

pub mod security;
