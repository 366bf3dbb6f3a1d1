pub mod classify;
pub mod model;
pub mod reconcile;
pub mod schedule;
