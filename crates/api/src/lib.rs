pub mod binding;
pub mod error;
pub mod mediator;
pub mod model;
pub mod publisher;
pub mod ranking;

// Re-export commonly used types
pub use binding::{Binding, ComponentEntry, Instance};
pub use error::{ApiError, ApiResult};
pub use mediator::{DynMediator, Mediator};
pub use model::{ComponentType, Key, Qualifier};
pub use publisher::{BindingPublisher, BindingSubscriber, DynPublisher, DynSubscriber};
pub use ranking::{DefaultRankingFunction, DynRanking, RankingFunction};
