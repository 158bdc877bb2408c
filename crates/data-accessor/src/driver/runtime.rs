//! Blocking bridge over the async native clients.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::{Builder, Runtime};

use crate::error::{Error, ExecutionError};

/// Current-thread runtime owned by one connection.
#[derive(Debug)]
pub struct BlockingRuntime {
    runtime: Runtime,
}

impl BlockingRuntime {
    pub fn new() -> crate::Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::connection(format!("failed to start I/O runtime: {e}")))?;
        Ok(Self { runtime })
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Drive `future` to completion, giving up after `deadline`.
    pub fn block_on_deadline<T, F>(
        &self,
        deadline: Option<Duration>,
        future: F,
    ) -> Result<T, ExecutionError>
    where
        F: Future<Output = Result<T, ExecutionError>>,
    {
        match deadline {
            Some(limit) => self
                .runtime
                .block_on(async { tokio::time::timeout(limit, future).await })
                .unwrap_or_else(|_| {
                    Err(ExecutionError::timeout(format!(
                        "command timed out after {} seconds",
                        limit.as_secs()
                    )))
                }),
            None => self.runtime.block_on(future),
        }
    }
}
