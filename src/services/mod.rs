pub mod database;
pub mod expo;
pub mod mailbox;
pub mod parser;
pub mod push;
pub mod relay;
