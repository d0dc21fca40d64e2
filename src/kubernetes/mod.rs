pub mod cordon;
pub mod kubers;
pub mod membership;
pub mod model;
