pub mod analysis;
pub mod doctor;
pub mod item;
pub mod prescription;
pub mod role;
pub mod user;
