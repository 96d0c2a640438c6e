//! Hosting-page commands - frontend to dashboard bridge

mod meetings;
mod monitoring;

pub use meetings::*;
pub use monitoring::*;
