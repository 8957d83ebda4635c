pub mod handlers;
pub mod models;
pub mod rank;
pub mod repository;

pub use models::{UserModel, UserResponse};
pub use rank::Rank;
pub use repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};
