pub mod commands;
pub mod dto;
pub mod request;
pub mod session;
pub mod time;
