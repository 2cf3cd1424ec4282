pub mod names;
pub mod sampler;
