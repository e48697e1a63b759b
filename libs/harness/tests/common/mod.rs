//! In-memory fake of the cluster-runtime surface, shared by the harness
//! integration tests.

// Shared between test binaries; not every binary uses every helper.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::Dispatch;

use silotest_harness::api::{
    ClusterBuilder, ClusterError, ClusterHandle, ConfigureCluster, LoggingRegistry,
    ServiceRegistry,
};
use silotest_harness::{ClusterFixture, SetupCallback, TestSettings};

/// Observation points into the fake cluster, shared with the test body.
#[derive(Clone, Default)]
pub struct ClusterProbe {
    pub deployed: Arc<AtomicBool>,
    pub stopped: Arc<AtomicBool>,
    pub disposed: Arc<AtomicBool>,
    providers: Arc<Mutex<Vec<String>>>,
    dispatch: Arc<Mutex<Option<Dispatch>>>,
}

impl ClusterProbe {
    /// Provider registrations the builder received, in call order.
    pub fn providers(&self) -> Vec<String> {
        self.providers.lock().unwrap().clone()
    }

    /// The dispatcher the built cluster logs through.
    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
            .lock()
            .unwrap()
            .clone()
            .expect("cluster has not been built")
    }
}

/// Fake cluster builder recording everything into its probe.
pub struct FakeClusterBuilder {
    probe: ClusterProbe,
    fail_build: Option<String>,
    configurators: Vec<Arc<dyn ConfigureCluster>>,
    services: ServiceRegistry,
    logging: LoggingRegistry,
}

impl FakeClusterBuilder {
    pub fn new(probe: ClusterProbe) -> Self {
        Self {
            probe,
            fail_build: None,
            configurators: Vec::new(),
            services: ServiceRegistry::new(),
            logging: LoggingRegistry::new(),
        }
    }

    /// A builder whose `build` fails with the given message.
    pub fn failing(probe: ClusterProbe, message: impl Into<String>) -> Self {
        let mut builder = Self::new(probe);
        builder.fail_build = Some(message.into());
        builder
    }
}

#[async_trait]
impl ClusterBuilder for FakeClusterBuilder {
    fn add_configurator(&mut self, configurator: Arc<dyn ConfigureCluster>) {
        self.configurators.push(configurator);
    }

    fn add_memory_storage(&mut self, name: &str) {
        self.probe
            .providers
            .lock()
            .unwrap()
            .push(format!("storage:{name}"));
    }

    fn add_memory_streams(&mut self, name: &str) {
        self.probe
            .providers
            .lock()
            .unwrap()
            .push(format!("streams:{name}"));
    }

    fn services(&mut self) -> &mut ServiceRegistry {
        &mut self.services
    }

    fn logging(&mut self) -> &mut LoggingRegistry {
        &mut self.logging
    }

    async fn build(mut self: Box<Self>) -> Result<Box<dyn ClusterHandle>, ClusterError> {
        if let Some(message) = self.fail_build.take() {
            return Err(ClusterError::Build(message));
        }

        let configurators = std::mem::take(&mut self.configurators);
        for configurator in &configurators {
            configurator.configure(&mut *self)?;
        }

        let Self {
            probe,
            services,
            logging,
            ..
        } = *self;
        *probe.dispatch.lock().unwrap() = Some(logging.into_dispatch());

        Ok(Box::new(FakeCluster { probe, services }))
    }
}

/// Fake built cluster; flips probe flags on deploy/stop/dispose.
pub struct FakeCluster {
    probe: ClusterProbe,
    services: ServiceRegistry,
}

#[async_trait]
impl ClusterHandle for FakeCluster {
    async fn deploy(&self) -> Result<(), ClusterError> {
        self.probe.deployed.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_all(&self) -> Result<(), ClusterError> {
        self.probe.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn services(&self) -> &ServiceRegistry {
        &self.services
    }
}

impl Drop for FakeCluster {
    fn drop(&mut self) {
        self.probe.disposed.store(true, Ordering::SeqCst);
    }
}

/// Base configurator that registers nothing.
pub struct NoopConfigure;

impl ConfigureCluster for NoopConfigure {
    fn configure(&self, _builder: &mut dyn ClusterBuilder) -> Result<(), ClusterError> {
        Ok(())
    }
}

/// Fixture over the fake runtime with overridable parts.
pub struct FakeFixture {
    pub probe: ClusterProbe,
    pub base: Arc<dyn ConfigureCluster>,
    pub services: Option<SetupCallback>,
    pub settings: TestSettings,
    pub fail_build: Option<String>,
}

impl FakeFixture {
    pub fn new() -> Self {
        Self {
            probe: ClusterProbe::default(),
            base: Arc::new(NoopConfigure),
            services: None,
            settings: TestSettings::default(),
            fail_build: None,
        }
    }
}

impl ClusterFixture for FakeFixture {
    fn builder(&self) -> Box<dyn ClusterBuilder> {
        match &self.fail_build {
            Some(message) => Box::new(FakeClusterBuilder::failing(self.probe.clone(), message)),
            None => Box::new(FakeClusterBuilder::new(self.probe.clone())),
        }
    }

    fn configure_cluster(&self) -> Arc<dyn ConfigureCluster> {
        Arc::clone(&self.base)
    }

    fn configure_services(&self) -> SetupCallback {
        self.services.clone().unwrap_or_else(|| Arc::new(|_| {}))
    }

    fn settings(&self) -> anyhow::Result<TestSettings> {
        Ok(self.settings.clone())
    }
}
