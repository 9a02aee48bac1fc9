pub mod likes;
pub mod locations;
pub mod recommendations;
