pub mod user;
pub mod repository;
pub mod contribution;
pub mod snapshot;

pub use user::*;
pub use repository::*;
pub use contribution::*;
pub use snapshot::*;
