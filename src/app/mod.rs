pub mod actions;
pub mod context;
pub mod notifications;
pub mod scheduler;
pub mod view;
