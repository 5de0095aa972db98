pub mod agreement;
pub mod repair;
