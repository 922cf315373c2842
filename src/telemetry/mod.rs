mod counters;

pub use counters::IntentCounters;
