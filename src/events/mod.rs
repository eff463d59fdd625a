pub mod listener;
pub mod observers;

pub use listener::{DebouncedResize, EventSubscription};
pub use observers::{IntersectionSubscription, MutationSubscription};
