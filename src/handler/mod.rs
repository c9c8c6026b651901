pub mod admin;
pub mod auth;
pub mod bans;
pub mod moderation;
pub mod orders;
pub mod reviews;
pub mod tickets;
pub mod users;
