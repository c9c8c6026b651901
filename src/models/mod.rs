pub mod banmodel;
pub mod moderationmodel;
pub mod notificationmodel;
pub mod ordermodel;
pub mod reviewmodel;
pub mod settingsmodel;
pub mod supportmodel;
pub mod usermodel;
pub mod walletmodel;
