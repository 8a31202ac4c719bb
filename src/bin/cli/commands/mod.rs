pub mod add;
pub mod available;
pub mod review;
pub mod session;
pub mod show;
