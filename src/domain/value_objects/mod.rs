pub mod policy_config;
pub mod severity;

pub use policy_config::PolicyConfig;
pub use severity::Severity;
