pub mod auth;
pub mod chat;
pub mod redeem;
pub mod subjects;
