pub mod clock;
pub mod fetch;
pub mod random;
pub mod store;
