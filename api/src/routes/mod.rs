pub mod health;
pub mod skill;
