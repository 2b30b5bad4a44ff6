pub mod attachment;
pub mod errors;
pub mod memory;
pub mod service;
pub mod store;
pub mod todo;

pub use attachment::*;
pub use errors::*;
pub use service::*;
pub use store::*;
pub use todo::*;
