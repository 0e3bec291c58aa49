mod commands;
mod events;

pub use commands::NotchCommand;
pub use events::{NotchEvent, Reply};
