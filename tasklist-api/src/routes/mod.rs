/// API route handlers
///
/// - `health`: Service banner and health check
/// - `users`: Signup, find-or-create, authentication and lookup
/// - `tasks`: Task CRUD for the authenticated caller

pub mod health;
pub mod tasks;
pub mod users;
