pub mod events_seed;

pub use events_seed::seed_events;
