pub mod zombie_field;

pub use zombie_field::ZombieField;
