pub mod handlers;
pub mod policy;
pub mod service;

pub use policy::XpPolicy;
pub use service::ProgressionService;
