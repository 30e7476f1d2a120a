pub mod error;
pub mod event;
pub mod thread;


pub use error::SessionError;
pub type Result<T> = std::result::Result<T, SessionError>;
