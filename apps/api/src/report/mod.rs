pub mod composer;
pub mod formatting;
pub mod handlers;
pub mod pipeline;
pub mod views;
