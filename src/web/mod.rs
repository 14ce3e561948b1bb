//! Host pipeline boundary.
//!
//! This module defines the shape of the server the validation middleware plugs
//! into: handlers that receive a mutable request/response pair and an explicit
//! continuation, and a separate error lane.
//!
//! # Integration Model
//!
//! Framework-specific code should:
//! 1. Build a [`Request`](crate::Request) from the framework's request,
//!    placing parsed body, query and route parameters in their aspects
//! 2. Run the handler chain (its own, or [`Pipeline`])
//! 3. Map the resulting [`Response`](crate::Response) or unconsumed
//!    [`PipelineError`](crate::PipelineError) back to the framework
//!
//! # Lane Flow
//!
//! ```text
//! handler ──Ok + next──▶ handler ──Err──▶ (normal handlers skipped)
//!                                              │
//!                                              ▼
//!                                        error handler ──Err──▶ error handler ...
//!                                              │
//!                                       Ok + next: back to the normal lane
//!                                       Ok: request ends
//! ```

mod handler;
mod pipeline;

pub use handler::{
    error_handler_fn, handler_fn, ErrorHandler, FnErrorHandler, FnHandler, Handler, Next,
};
pub use pipeline::Pipeline;
