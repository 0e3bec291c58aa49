mod paths;
mod settings;

pub use paths::NotchPaths;
pub use settings::{NotchSettings, OPENING_PROFILE_IOS, OPENING_PROFILE_SPRING};
