pub mod common;
pub mod email;
pub mod notification;
pub mod push;
pub mod relay;
