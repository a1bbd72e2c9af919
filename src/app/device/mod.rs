pub mod channel;
pub mod mock;
pub mod samples;
