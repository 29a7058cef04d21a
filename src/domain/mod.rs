pub mod collection;
pub mod item;
pub mod subscription;

pub use collection::{Collection, OrderKey};
pub use item::{Item, NewItem};
pub use subscription::Subscription;
