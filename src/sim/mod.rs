pub mod deck;
pub mod event;
pub mod records;
pub mod session;
pub mod step;
