//! # dailynote core library
//!
//! Business logic for a personal daily tracker: a task list that rolls over
//! at the day boundary, a hydration schedule derived from work hours, and
//! reminder copy whose tone follows how loaded the day looks. The `dailynote`
//! CLI is a thin host over this crate.
//!
//! ## Architecture
//!
//! - **Planner**: the single owner of all tracked state. Every user action is
//!   a method call; changes are recorded as [`Event`]s and dirty keys.
//! - **Rollover**: archives the outgoing day and carries open tasks forward.
//! - **Water**: fixed hydration slots placed relative to work hours.
//! - **Notifications**: instructions handed to an injected sink; the core
//!   never delivers anything itself.
//! - **Messages**: context classification and day-indexed copy rotation.
//! - **Storage**: a string key-value store holding JSON records, plus the
//!   TOML host configuration.
//! - **Runtime**: a tokio loop that serialises commands and periodic ticks
//!   into the planner and debounces persistence.
//!
//! Time is read through the [`Clock`] trait so everything can be tested
//! against a fixed instant.

pub mod clock;
pub mod error;
pub mod events;
pub mod message;
pub mod model;
pub mod notify;
pub mod planner;
pub mod rollover;
pub mod runtime;
pub mod storage;
pub mod water;
pub mod work_session;

pub use clock::{Clock, DayBoundary, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::Event;
pub use message::{Message, MessageCategory, MessageContext, MessageParams};
pub use model::{
    AppSettings, DailyData, DailyRoutine, DailySummary, Task, Tone, UserProfile, WaterGoal,
    WaterLogEntry, WorkHours,
};
pub use notify::{
    MemorySink, NotificationAction, NotificationCategory, NotificationRequest, NotificationSink,
};
pub use planner::Planner;
pub use rollover::{DayState, RolloverEngine, RolloverPolicy, RolloverResult};
pub use runtime::{RuntimeHandle, RuntimeOptions};
pub use storage::{Config, JsonFileStore, KeyValueStore, MemoryStore};
pub use work_session::{WorkCue, WorkSession};
