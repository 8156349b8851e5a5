//! Users Domain
//!
//! Minimal user management: CRUD plus lookup by email, with unique
//! username and email. Follows the same layering as the tasks domain
//! (models → repository trait → backends → service → handlers).

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use memory::MemoryUserRepository;
pub use models::{CreateUser, UpdateUser, User, UserFilter};
pub use mongodb::MongoUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
