/// Domain models for Tasklist
///
/// Each model carries its own SQL queries for the PostgreSQL store; the
/// in-memory store works on the same structs directly.
///
/// # Models
///
/// - `user`: Accounts identified by a unique email
/// - `task`: To-do items owned by a single user
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::models::user::User;
/// use tasklist_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::insert(&pool, &User::new("user@example.com")).await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
