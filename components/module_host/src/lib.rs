//! Module registry and call routing
//!
//! This module provides the host-facing surface of the profiler. It routes
//! `module.method` calls with positional JSON arguments to registered module
//! handlers (`timeProfiler`, `heapProfiler`) and wraps their results in
//! replies.

pub mod args;

use async_trait::async_trait;
use dashmap::DashMap;
use profile_types::{HostCall, HostError, HostReply};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub use args::{expect_arity, expect_bool, expect_i32, expect_string, expect_u32};

/// Trait that all exported modules must implement
///
/// A module groups related methods under one name, the way a native
/// extension exports an object of functions.
#[async_trait]
pub trait ModuleHandler: Send + Sync {
    /// Returns the name of this module (e.g., "timeProfiler")
    fn name(&self) -> &str;

    /// Handle a method call for this module
    ///
    /// # Arguments
    /// * `method` - The method name (without module prefix, e.g., "startProfiling")
    /// * `args` - Positional arguments
    ///
    /// # Returns
    /// Result containing the method's return value or a host error
    async fn handle_method(&self, method: &str, args: Vec<Value>) -> Result<Value, HostError>;
}

/// Routes host calls to the appropriate module handler
pub struct ModuleHost {
    /// Registry of module handlers, keyed by module name
    modules: Arc<DashMap<String, Arc<dyn ModuleHandler>>>,
}

impl ModuleHost {
    /// Create a new ModuleHost
    ///
    /// # Example
    /// ```
    /// use module_host::ModuleHost;
    ///
    /// let host = ModuleHost::new();
    /// assert!(host.module_names().is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            modules: Arc::new(DashMap::new()),
        }
    }

    /// Register a module handler, replacing any module with the same name
    pub fn register_module(&self, handler: Arc<dyn ModuleHandler>) {
        let name = handler.name().to_string();
        debug!("Registering module: {}", name);
        self.modules.insert(name, handler);
    }

    /// Unregister a module handler
    ///
    /// # Returns
    /// The removed handler, if it existed
    pub fn unregister_module(&self, module_name: &str) -> Option<Arc<dyn ModuleHandler>> {
        debug!("Unregistering module: {}", module_name);
        self.modules.remove(module_name).map(|(_, v)| v)
    }

    /// Names of all registered modules, sorted
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Call `module.method` directly with positional arguments
    ///
    /// # Example
    /// ```ignore
    /// let profile = host
    ///     .call("timeProfiler.stopProfiling", vec![json!("run1"), json!(false)])
    ///     .await?;
    /// ```
    pub async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, HostError> {
        if method.is_empty() {
            warn!("Call missing method name");
            return Err(HostError::invalid_request());
        }

        let (module_name, method_name) = self.parse_method(method)?;

        debug!("Routing call to module: {}, method: {}", module_name, method_name);

        // Clone the handler out so the registry shard is not held across the await
        let handler = self
            .modules
            .get(module_name)
            .ok_or_else(|| {
                warn!("Module not found: {}", module_name);
                HostError::method_not_found(method)
            })?
            .clone();

        handler.handle_method(method_name, args).await
    }

    /// Handle an incoming JSON call envelope
    ///
    /// Parses the message, routes it to the module, and returns a
    /// JSON-formatted reply. Never fails: errors are encoded in the reply.
    ///
    /// # Example
    /// ```ignore
    /// let reply = host
    ///     .handle_message(r#"{"id": 1, "method": "heapProfiler.getAllocationProfile"}"#)
    ///     .await;
    /// ```
    pub async fn handle_message(&self, message: &str) -> String {
        let call = match self.parse_call(message) {
            Ok(call) => call,
            Err(error) => {
                return self.create_error_reply(None, error);
            }
        };

        let call_id = call.id;

        match self.call(&call.method, call.args).await {
            Ok(result) => self.create_success_reply(call_id, result),
            Err(error) => self.create_error_reply(Some(call_id), error),
        }
    }

    /// Parse a JSON string into a host call
    fn parse_call(&self, message: &str) -> Result<HostCall, HostError> {
        // Distinguish malformed JSON from well-formed JSON with the wrong shape
        let json: Value = serde_json::from_str(message).map_err(|e| {
            error!("Invalid JSON: {}", e);
            HostError::parse_error()
        })?;

        serde_json::from_value::<HostCall>(json).map_err(|e| {
            error!("Invalid call structure: {}", e);
            HostError::invalid_request()
        })
    }

    /// Split "module.method" into its two parts
    fn parse_method<'a>(&self, method: &'a str) -> Result<(&'a str, &'a str), HostError> {
        match method.split_once('.') {
            Some((module, name)) if !module.is_empty() && !name.is_empty() => Ok((module, name)),
            _ => {
                warn!("Invalid method format (expected module.method): {}", method);
                Err(HostError::invalid_request())
            }
        }
    }

    fn create_success_reply(&self, id: u64, result: Value) -> String {
        let reply = HostReply {
            id,
            result: Some(result),
            error: None,
        };

        serde_json::to_string(&reply).unwrap_or_else(|e| {
            error!("Failed to serialize reply: {}", e);
            self.create_error_reply(
                Some(id),
                HostError::internal_error("Failed to serialize reply"),
            )
        })
    }

    fn create_error_reply(&self, id: Option<u64>, error: HostError) -> String {
        let reply = HostReply {
            id: id.unwrap_or(0),
            result: None,
            error: Some(error),
        };

        serde_json::to_string(&reply).unwrap_or_else(|e| {
            error!("Failed to serialize error reply: {}", e);
            format!(
                r#"{{"id":{},"error":{{"code":-32603,"message":"Internal error"}}}}"#,
                id.unwrap_or(0)
            )
        })
    }
}

impl Default for ModuleHost {
    fn default() -> Self {
        Self::new()
    }
}
