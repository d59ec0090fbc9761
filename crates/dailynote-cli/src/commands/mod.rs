pub mod config;
pub mod history;
pub mod notes;
pub mod notifications;
pub mod profile;
pub mod routine;
pub mod run;
pub mod settings;
pub mod status;
pub mod task;
pub mod water;
