pub mod bandb;
#[allow(clippy::module_inception)]
pub mod db;
pub mod moderationdb;
pub mod orderdb;
pub mod reviewdb;
pub mod settingsdb;
pub mod supportdb;
pub mod userdb;
