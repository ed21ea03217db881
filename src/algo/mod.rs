/// Table based methods for discrete state and action spaces
pub mod tabular;
