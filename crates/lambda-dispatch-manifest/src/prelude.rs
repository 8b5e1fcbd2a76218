//! # Manifest Prelude
//!
//! ```rust
//! use lambda_dispatch_manifest::prelude::*;
//! ```

pub use crate::error::{ManifestError, NamingError};
pub use crate::manifest::{DeploymentManifest, FunctionDefinition, GeneratorOptions};
pub use crate::naming::resolve_function_name;
pub use crate::routes::{Route, RouteTable};
