pub mod action_selection;
pub mod agent;
pub mod config;
pub mod env;
pub mod exploration;
pub mod table;
pub mod trainer;
pub mod utils;

mod error;

pub use agent::{Agent, SarsaLambdaAgent};
pub use config::{AgentConfig, TraceKind, TraceReset};
pub use error::{ConfigError, EnvError};
pub use exploration::ExplorationSchedule;
pub use table::{ActionTable, TraceTable, ValueTable};
