//! Shared-cluster lifecycle for a test group.
//!
//! A test group implements [`ClusterFixture`] once; [`ClusterHarness::set_up`]
//! runs before the group's tests and [`ClusterHarness::tear_down`] after. The
//! harness composes the fixture's base cluster configuration with settings
//! registration, the test-output log layer, and the fixture's service
//! callback, then drives the external builder.
//!
//! At most one harness may be live per process. The guard is released on
//! teardown, so consecutive group runs can each hold their own cluster.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use silotest_api::{ClusterBuilder, ClusterError, ClusterHandle, ConfigureCluster};

use crate::error::HarnessError;
use crate::logging::TestOutputLayer;
use crate::output::OutputRouter;
use crate::settings::TestSettings;

/// Process-wide guard: at most one live cluster at a time.
static LIVE_HARNESS: AtomicBool = AtomicBool::new(false);

/// Callback applied to the builder during composition.
pub type SetupCallback = Arc<dyn Fn(&mut dyn ClusterBuilder) + Send + Sync>;

/// Lifecycle states of a [`ClusterHarness`].
///
/// `Uninitialized → SettingUp → Ready → TearingDown → Uninitialized`; the
/// intermediate states are only held while `set_up` / `tear_down` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Uninitialized,
    SettingUp,
    Ready,
    TearingDown,
}

/// Per-group hooks for building the shared cluster.
///
/// `builder` and `configure_cluster` are required; the remaining hooks have
/// defaults: no extra services, a log pipeline wired to the test output
/// router, and settings loaded from [`crate::settings::SETTINGS_FILE`].
pub trait ClusterFixture: Send + Sync {
    /// A fresh builder from the cluster runtime this group tests against.
    fn builder(&self) -> Box<dyn ClusterBuilder>;

    /// The group's base cluster configuration.
    fn configure_cluster(&self) -> Arc<dyn ConfigureCluster>;

    /// Additional service registrations for the group's tests.
    fn configure_services(&self) -> SetupCallback {
        Arc::new(|_| {})
    }

    /// Log pipeline registration.
    ///
    /// The default registers a [`TestOutputLayer`] built from the settings,
    /// writing to whichever test currently holds the router.
    fn configure_logging(&self, settings: &TestSettings, output: &OutputRouter) -> SetupCallback {
        let logging = settings.logging.clone();
        let output = output.clone();
        Arc::new(move |builder: &mut dyn ClusterBuilder| {
            builder
                .logging()
                .add_layer(TestOutputLayer::new(Some(&logging), output.clone()));
        })
    }

    /// The group's settings source.
    fn settings(&self) -> anyhow::Result<TestSettings> {
        TestSettings::load_default()
    }
}

/// The composed configurator handed to the external builder.
///
/// Application order: base cluster configuration, then the settings
/// singleton, then logging, then the group's service callback. Service
/// callbacks can therefore rely on configuration and logging being
/// registered already.
pub struct ComposedConfigurator {
    base: Arc<dyn ConfigureCluster>,
    settings: TestSettings,
    logging: SetupCallback,
    services: SetupCallback,
}

impl ComposedConfigurator {
    /// Bundle the four configuration parts.
    pub fn new(
        base: Arc<dyn ConfigureCluster>,
        settings: TestSettings,
        logging: SetupCallback,
        services: SetupCallback,
    ) -> Self {
        Self {
            base,
            settings,
            logging,
            services,
        }
    }
}

impl ConfigureCluster for ComposedConfigurator {
    fn configure(&self, builder: &mut dyn ClusterBuilder) -> Result<(), ClusterError> {
        self.base.configure(builder)?;
        builder
            .services()
            .register_singleton(Arc::new(self.settings.clone()));
        (self.logging)(builder);
        (self.services)(builder);
        Ok(())
    }
}

/// Owns the shared cluster for the duration of a test group.
pub struct ClusterHarness {
    state: HarnessState,
    cluster: Option<Box<dyn ClusterHandle>>,
    settings: TestSettings,
    output: OutputRouter,
}

impl ClusterHarness {
    /// Build and deploy the group's shared cluster.
    ///
    /// Panics if another harness is already live in this process. Builder
    /// and deploy failures release the live guard and propagate.
    pub async fn set_up(fixture: &dyn ClusterFixture) -> Result<Self, HarnessError> {
        if LIVE_HARNESS
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            panic!("a cluster harness is already live in this process; tear it down first");
        }

        match Self::set_up_inner(fixture).await {
            Ok(harness) => Ok(harness),
            Err(error) => {
                LIVE_HARNESS.store(false, Ordering::SeqCst);
                Err(error)
            }
        }
    }

    async fn set_up_inner(fixture: &dyn ClusterFixture) -> Result<Self, HarnessError> {
        debug!("setting up shared test cluster");
        let settings = fixture.settings().map_err(HarnessError::Settings)?;
        let output = OutputRouter::new();

        let composed = ComposedConfigurator::new(
            fixture.configure_cluster(),
            settings.clone(),
            fixture.configure_logging(&settings, &output),
            fixture.configure_services(),
        );

        let mut builder = fixture.builder();
        builder.add_configurator(Arc::new(composed));
        let cluster = builder.build().await?;
        cluster.deploy().await?;
        info!("test cluster deployed");

        Ok(Self {
            state: HarnessState::Ready,
            cluster: Some(cluster),
            settings,
            output,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HarnessState {
        self.state
    }

    /// Settings the cluster was configured with.
    pub fn settings(&self) -> &TestSettings {
        &self.settings
    }

    /// Router a test attaches its output sink to.
    pub fn output(&self) -> &OutputRouter {
        &self.output
    }

    /// The live cluster.
    ///
    /// Panics unless the harness is `Ready`; touching the cluster before
    /// setup or after teardown is a programming error.
    pub fn cluster(&self) -> &dyn ClusterHandle {
        match &self.cluster {
            Some(cluster) if self.state == HarnessState::Ready => cluster.as_ref(),
            _ => panic!(
                "cluster accessed while harness is {:?}; it is only available between set_up and tear_down",
                self.state
            ),
        }
    }

    /// Stop and dispose the cluster; no-op when already torn down.
    ///
    /// Releases the process-wide live guard so a later group can set up its
    /// own cluster.
    pub async fn tear_down(&mut self) -> Result<(), HarnessError> {
        let Some(cluster) = self.cluster.take() else {
            return Ok(());
        };
        self.state = HarnessState::TearingDown;
        debug!("stopping test cluster");

        let result = cluster.stop_all().await;
        drop(cluster);

        self.state = HarnessState::Uninitialized;
        LIVE_HARNESS.store(false, Ordering::SeqCst);
        info!("test cluster torn down");
        result.map_err(HarnessError::from)
    }
}

impl Drop for ClusterHarness {
    fn drop(&mut self) {
        if self.cluster.take().is_some() {
            warn!("cluster harness dropped without tear_down; cluster disposed without a clean stop");
            LIVE_HARNESS.store(false, Ordering::SeqCst);
        }
    }
}

impl std::fmt::Debug for ClusterHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterHarness")
            .field("state", &self.state)
            .field("cluster", &self.cluster.is_some())
            .finish()
    }
}
