//! Service lifecycle hooks

use std::sync::Arc;

use async_trait::async_trait;
use lambda_dispatch_metadata::{ClassId, HandlerResult, Value};

/// Runtime service class
///
/// Wraps every invocation of the service's handlers: `pre_handle` runs before
/// middleware and may mutate the event and context, `post_handle` receives the
/// method's result (or a status-code error response) and returns the value
/// that is actually delivered.
#[async_trait]
pub trait Service: Send + Sync {
    fn class_id(&self) -> ClassId;

    async fn pre_handle(&self, _event: &mut Value, _context: &mut Value) -> HandlerResult<()> {
        Ok(())
    }

    async fn post_handle(&self, _event: &Value, _context: &Value, result: Value) -> HandlerResult<Value> {
        Ok(result)
    }
}

pub type SharedService = Arc<dyn Service>;

/// Service without hooks
#[derive(Debug, Clone, Copy)]
pub struct HooklessService {
    class: ClassId,
}

impl HooklessService {
    pub fn new(class: ClassId) -> Self {
        Self { class }
    }

    pub fn for_type<T: ?Sized + 'static>() -> Self {
        Self::new(ClassId::of::<T>())
    }
}

#[async_trait]
impl Service for HooklessService {
    fn class_id(&self) -> ClassId {
        self.class
    }
}
