pub mod eligibility;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use eligibility::{check_eligibility, PurchaseEligibility};
pub use models::WardrobeItem;
pub use repository::{InMemoryWardrobeRepository, PostgresWardrobeRepository, WardrobeRepository};
pub use service::WardrobeService;
