use std::collections::HashMap;
use std::sync::Arc;

use horizon_favicon_core::{DispatchThread, Dispatcher, Executor, ThreadPool};
use horizon_favicon_net::{ConnectionFactory, HttpClientBuilder, HttpClientConfig};
use parking_lot::Mutex;

use super::report::{self, ErrorObserver, FetchReport, MessageObserver, UpdateObserver};
use super::{FaviconSupport, SupportInner};
use crate::error::{FaviconError, Result};
use crate::favicon_ref::FaviconRef;
use crate::supplier::{self, FaviconSupplier};

/// Builder for [`FaviconSupport`].
///
/// Everything is optional. Unset parts default to:
///
/// - suppliers: [`default_suppliers`](crate::default_suppliers)
/// - executor: the shared [`ThreadPool`]
/// - dispatcher: a new [`DispatchThread`]
/// - connections: an [`HttpClient`](horizon_favicon_net::HttpClient) built
///   from the HTTP config
/// - observers: `tracing` events on the `horizon_favicon::support` target
pub struct FaviconSupportBuilder {
    suppliers: Vec<Arc<dyn FaviconSupplier>>,
    ignore_parent_domain: bool,
    executor: Option<Arc<dyn Executor>>,
    dispatcher: Option<Arc<dyn Dispatcher>>,
    connections: Option<Arc<dyn ConnectionFactory>>,
    http_config: HttpClientConfig,
    on_message: MessageObserver,
    on_error: ErrorObserver,
    on_update: UpdateObserver,
}

impl Default for FaviconSupportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FaviconSupportBuilder {
    /// A builder with every part at its default.
    pub fn new() -> Self {
        Self {
            suppliers: supplier::default_suppliers(),
            ignore_parent_domain: false,
            executor: None,
            dispatcher: None,
            connections: None,
            http_config: HttpClientConfig::default(),
            on_message: report::log_message(),
            on_error: report::log_error(),
            on_update: report::log_update(),
        }
    }

    /// Replace the supplier list.
    pub fn suppliers<I>(mut self, suppliers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn FaviconSupplier>>,
    {
        self.suppliers = suppliers.into_iter().collect();
        self
    }

    /// Add one supplier to the list.
    pub fn supplier(mut self, supplier: impl FaviconSupplier + 'static) -> Self {
        self.suppliers.push(Arc::new(supplier));
        self
    }

    /// Never fall back to parent domains.
    pub fn ignore_parent_domain(mut self, ignore: bool) -> Self {
        self.ignore_parent_domain = ignore;
        self
    }

    /// Where resolutions run.
    pub fn executor(mut self, executor: impl Executor + 'static) -> Self {
        self.executor = Some(Arc::new(executor));
        self
    }

    /// Where cache updates and update notifications run.
    pub fn dispatcher(mut self, dispatcher: impl Dispatcher + 'static) -> Self {
        self.dispatcher = Some(Arc::new(dispatcher));
        self
    }

    /// How suppliers reach the network. Takes precedence over
    /// [`http_config`](Self::http_config).
    pub fn connection_factory(mut self, connections: impl ConnectionFactory + 'static) -> Self {
        self.connections = Some(Arc::new(connections));
        self
    }

    /// Configuration for the default HTTP connection factory.
    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Observe every supplier attempt.
    pub fn on_message(mut self, observer: impl Fn(&FetchReport) + Send + Sync + 'static) -> Self {
        self.on_message = Arc::new(observer);
        self
    }

    /// Observe supplier failures.
    pub fn on_error(
        mut self,
        observer: impl Fn(&FaviconRef, &str, &FaviconError) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Arc::new(observer);
        self
    }

    /// Called on the dispatcher after a ref resolves.
    pub fn on_update(mut self, observer: impl Fn(&FaviconRef) + Send + Sync + 'static) -> Self {
        self.on_update = Arc::new(observer);
        self
    }

    /// Build the support, creating whichever defaults are needed.
    pub fn build(self) -> Result<FaviconSupport> {
        let mut suppliers = self.suppliers;
        supplier::sort_by_rank(&mut suppliers);

        let executor: Arc<dyn Executor> = match self.executor {
            Some(executor) => executor,
            None => ThreadPool::global()?,
        };
        let dispatcher: Arc<dyn Dispatcher> = match self.dispatcher {
            Some(dispatcher) => dispatcher,
            None => Arc::new(DispatchThread::new()?),
        };
        let connections: Arc<dyn ConnectionFactory> = match self.connections {
            Some(connections) => connections,
            None => Arc::new(HttpClientBuilder::from_config(self.http_config).build()?),
        };

        tracing::debug!(
            target: horizon_favicon_core::logging::targets::SUPPORT,
            suppliers = suppliers.len(),
            ignore_parent_domain = self.ignore_parent_domain,
            "favicon support created"
        );

        Ok(FaviconSupport::from_inner(SupportInner {
            suppliers,
            connections,
            executor,
            dispatcher,
            ignore_parent_domain: self.ignore_parent_domain,
            cache: Mutex::new(HashMap::new()),
            on_message: self.on_message,
            on_error: self.on_error,
            on_update: self.on_update,
        }))
    }
}

impl std::fmt::Debug for FaviconSupportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaviconSupportBuilder")
            .field("suppliers", &self.suppliers)
            .field("ignore_parent_domain", &self.ignore_parent_domain)
            .field("http_config", &self.http_config)
            .finish_non_exhaustive()
    }
}
