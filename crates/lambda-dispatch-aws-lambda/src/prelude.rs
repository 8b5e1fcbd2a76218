//! # Lambda Dispatch Prelude
//!
//! ```rust
//! use lambda_dispatch_aws_lambda::prelude::*;
//! ```

pub use crate::builder::LambdaDispatchBuilder;
pub use crate::config::LambdaConfig;
pub use crate::error::LambdaError;
pub use crate::handler::LambdaDispatchHandler;
pub use crate::server::LambdaDispatchServer;
pub use crate::{init_tracing, run};
