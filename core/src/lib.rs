pub mod calendar;
pub mod error;
pub mod plants;
pub mod response;
pub mod skill;
pub mod weather;
