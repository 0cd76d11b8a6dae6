pub mod command;
pub mod navigator;
pub mod render;
pub mod session;
