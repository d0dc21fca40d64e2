pub mod model;
pub mod pubsub;
#[cfg(test)]
pub mod stubs;
