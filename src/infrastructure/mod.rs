pub mod effectors;
pub mod notifications;
pub mod persistence;
pub mod sources;
