pub mod delta;
pub mod sampler;
pub mod snapshot;
pub mod users;
