//! Operations context for dependency injection

use mosdeps_config::{Config, InstallRoot};
use mosdeps_errors::Error;
use mosdeps_events::EventSender;
use mosdeps_install::PackageInstaller;
use mosdeps_net::{NetClient, NetConfig, PackageDownloader};
use mosdeps_platform::{ProcessOperations, ShellProcessOperations};
use mosdeps_state::InstallState;
use std::path::PathBuf;
use std::sync::Arc;

use crate::firmware::FirmwareCli;

/// Operations context providing access to all components
pub struct OpsCtx {
    /// Install markers under the install root
    pub state: InstallState,
    pub downloader: PackageDownloader,
    pub installer: PackageInstaller,
    /// Runs the firmware CLI and the compiler
    pub process: Arc<dyn ProcessOperations>,
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// System configuration
    pub config: Config,
}

impl OpsCtx {
    /// Firmware CLI bound to `project_dir`
    #[must_use]
    pub fn firmware_cli(&self, project_dir: impl Into<PathBuf>) -> FirmwareCli {
        FirmwareCli::new(
            Arc::clone(&self.process),
            self.config.toolchain.cli.clone(),
            project_dir,
        )
        .login_shell(self.config.toolchain.login_shell)
    }
}

/// Builder for [`OpsCtx`]
pub struct OpsContextBuilder {
    root: Option<InstallRoot>,
    net: Option<NetClient>,
    process: Option<Arc<dyn ProcessOperations>>,
    tx: Option<EventSender>,
    config: Option<Config>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: None,
            net: None,
            process: None,
            tx: None,
            config: None,
        }
    }

    /// Use `root` instead of the configured install root
    #[must_use]
    pub fn with_install_root(mut self, root: InstallRoot) -> Self {
        self.root = Some(root);
        self
    }

    /// Set network client
    #[must_use]
    pub fn with_net(mut self, net: NetClient) -> Self {
        self.net = Some(net);
        self
    }

    /// Set process runner
    #[must_use]
    pub fn with_process(mut self, process: Arc<dyn ProcessOperations>) -> Self {
        self.process = Some(process);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context
    ///
    /// Components not supplied explicitly are derived from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the event sender or configuration is missing, if
    /// no install root can be resolved, or if the HTTP client cannot be built.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let tx = self
            .tx
            .ok_or_else(|| Error::internal("missing component: event_sender"))?;

        let config = self
            .config
            .ok_or_else(|| Error::internal("missing component: config"))?;

        let root = match self.root {
            Some(root) => root,
            None => config.install_root()?,
        };

        let net = match self.net {
            Some(net) => net,
            None => NetClient::new(NetConfig::from(&config.network))?,
        };

        let process = self.process.unwrap_or_else(|| {
            Arc::new(ShellProcessOperations::new().with_events(tx.clone()))
        });

        let mut downloader = PackageDownloader::new(net);
        if let Some(dir) = &config.paths.temp_dir {
            downloader = downloader.with_temp_dir(dir);
        }

        let state = InstallState::new(root.clone()).with_events(tx.clone());
        let installer = PackageInstaller::new(root, state.clone());

        Ok(OpsCtx {
            state,
            downloader,
            installer,
            process,
            tx,
            config,
        })
    }
}

impl Default for OpsContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
