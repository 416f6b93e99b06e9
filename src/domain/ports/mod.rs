pub mod effector;
pub mod notifier;
pub mod source;
pub mod store;

pub use effector::{Effector, EffectorError};
pub use notifier::{ChannelResult, NotificationError, Notifier};
pub use source::{SignalSource, SourceError, TargetDiscovery};
pub use store::{StateStore, StoreError};
