pub mod admin;
pub mod gallery;
pub mod health;
pub mod submissions;
