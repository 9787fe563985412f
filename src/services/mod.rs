pub mod about;
pub mod albums;
pub mod auth;
pub mod events;
pub mod media;
pub mod tracks;
pub mod upload;
pub mod users;
