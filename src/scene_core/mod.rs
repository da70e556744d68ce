pub mod command;
pub mod config;
pub mod input;
pub mod launch;
pub mod sky;
pub mod tick;
pub mod time;
pub mod viewport;
