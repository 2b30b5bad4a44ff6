pub mod dynamodb;
pub mod models;
pub mod s3;
pub mod todo_repository;

pub use dynamodb::*;
pub use models::*;
pub use s3::*;
pub use todo_repository::*;
