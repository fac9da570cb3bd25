// Greeting quote generation.
// Flow: validate request -> build prompt -> one completion call -> extract quotes.

pub mod export;
pub mod extractor;
pub mod generator;
pub mod handlers;
pub mod presets;
pub mod prompts;
pub mod request;
