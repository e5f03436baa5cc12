pub mod character;
pub mod event;
pub mod narrative;
pub mod relationship;
