pub mod bodies;
pub mod particles;
