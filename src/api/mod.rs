pub mod engineers;
pub mod health;
pub mod reply;
pub mod search;
pub mod swagger;
pub mod testing;
pub mod users;
