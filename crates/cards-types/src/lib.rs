pub mod card;
pub mod chat;
pub mod event;
pub mod config;
pub mod error;
pub mod session;
pub mod timestamp;

#[cfg(test)]
mod tests;

pub use error::CardsError;

pub type Result<T> = std::result::Result<T, CardsError>;
