//! Task module - typed tasks and the ordered pipeline that executes them.
//!
//! - All task kinds form one closed enum, matched exhaustively by the executor
//! - Invariants are documented on the types and enforced in constructors
//! - Pure workloads (`bench`) are separated from IO-bound execution

mod bench;
mod pipeline;
mod result;
pub mod task;

pub use bench::{blockchain, loop_calc, Benchmark};
pub use pipeline::{
    Capabilities, Pipeline, PipelineConfig, PipelineState, RunSummary, MAX_VERBOSITY,
};
pub use result::{TaskOutput, TaskResult};
pub use task::{MathOp, Task, TaskError, TaskId};
