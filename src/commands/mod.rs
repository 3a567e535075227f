/// Each command returns a result struct instead of printing its final output;
/// main.rs decides how to present it. `chat` is the exception for its streamed
/// lines, which it writes to the console it is handed as they arrive.
mod chat;
mod models;

pub use chat::*;
pub use models::*;
