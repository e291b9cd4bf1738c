pub mod retrieve_events;
