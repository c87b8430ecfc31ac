//! Build plan emission and hand-off to external tools.
//!
//! The plan is pure data. Executing it means turning each action into a tool
//! command line and running those commands in order.

pub mod command;
pub mod executor;
pub mod plan;

pub use command::tool_command;
pub use executor::{ActionRunner, Artifact, PlanExecutor, ProcessRunner, RecordingRunner};
pub use plan::{emit_build_plan, BuildAction, BuildPlan};
