//! Trade execution workflow: operator questions, market buy, OCO sell, repeat.

pub mod machine;
pub mod messages;
pub mod operator;
pub mod state;
pub mod validator;

pub use machine::{TradeWorkflow, WorkflowConfig, WorkflowError};
pub use operator::{Operator, Tone};
pub use state::{CycleState, TradeState, trading_pair};
pub use validator::{ParsedValue, ValidationError, validate, validate_budget, validate_number};
