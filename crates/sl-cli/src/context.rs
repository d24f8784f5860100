//! Per-invocation execution context

use anyhow::Result;
use sl_core::{Directive, ResolvedConfiguration};
use sl_db::Closeable;
use std::path::{Path, PathBuf};

use crate::completion;

/// Everything one invocation works with, including the live handle.
///
/// The handle is only released through [`ExecutionContext::finish`], which
/// consumes the context, so it is closed exactly once.
pub(crate) struct ExecutionContext<'a, H: ?Sized> {
    directive: &'a Directive,
    config: &'a ResolvedConfiguration,
    dir: Option<PathBuf>,
    handle: Box<H>,
}

impl<'a, H: Closeable + ?Sized> ExecutionContext<'a, H> {
    pub(crate) fn new(
        directive: &'a Directive,
        config: &'a ResolvedConfiguration,
        dir: Option<PathBuf>,
        handle: Box<H>,
    ) -> Self {
        Self {
            directive,
            config,
            dir,
            handle,
        }
    }

    pub(crate) fn directive(&self) -> &Directive {
        self.directive
    }

    pub(crate) fn config(&self) -> &ResolvedConfiguration {
        self.config
    }

    /// Effective (scoped) unit directory; `None` for database administration
    pub(crate) fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub(crate) fn handle(&self) -> &H {
        &self.handle
    }

    /// Close the handle and surface `outcome` through the completion protocol.
    pub(crate) async fn finish<T>(self, outcome: Result<T>) -> Result<T> {
        completion::complete(self.handle, outcome).await
    }
}
