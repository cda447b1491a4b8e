pub mod carousel;
pub mod chat;
pub mod detail;
pub mod input;
pub mod settings;
