pub mod sink;
pub mod source;
pub mod store;

pub use sink::MessageSink;
pub use source::{Delivery, Fetch, MessageSource, Receipt};
pub use store::PayloadStore;
