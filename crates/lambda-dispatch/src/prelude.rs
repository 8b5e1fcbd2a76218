//! # Dispatch Prelude
//!
//! ```rust
//! use lambda_dispatch::prelude::*;
//! ```

pub use crate::container::{Container, NamedContainer};
pub use crate::dispatcher::Dispatcher;
pub use crate::error::DispatchError;
pub use crate::handler::{Args, EventHandler, MethodSignature, MethodTable};
pub use crate::response::HttpResponse;
pub use crate::service::{HooklessService, Service};
