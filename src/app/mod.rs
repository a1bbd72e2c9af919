pub mod activity_log;
pub mod config;
pub mod device;
pub mod error;
pub mod guide;
pub mod logging;
pub mod lookup;
pub mod models;
pub mod state;
pub mod troubleshooting;
pub mod workflow;
