pub mod events;
pub mod handle;
pub mod probe;
pub mod source;
pub mod widget;
