use crate::server::{
    fixtures::read_fixture_store,
    handler::FixtureHandler,
    server::{FixtureServer, FixtureServerConfig},
    state::{FixtureStateManager, StateManager},
    TaskMockServer,
};
use std::{error::Error, path::PathBuf, sync::Arc};

/// The `FixtureServerBuilder` struct is used to configure the fixture server.
/// It collects the listener settings and the fixture directory; `build()`
/// loads the fixtures and wires store, handler and listener together.
pub struct FixtureServerBuilder {
    port: Option<u16>,
    expose: Option<bool>,
    print_access_log: Option<bool>,
    fixture_dir: Option<PathBuf>,
}

impl FixtureServerBuilder {
    pub fn new() -> Self {
        FixtureServerBuilder {
            port: None,
            expose: None,
            print_access_log: None,
            fixture_dir: None,
        }
    }

    /// Sets the port for the fixture server. Without a port, the server binds
    /// to an ephemeral one.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the port for the fixture server as an optional value.
    pub fn port_option(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Sets whether the server should be exposed to external access.
    pub fn expose(mut self, expose: bool) -> Self {
        self.expose = Some(expose);
        self
    }

    /// Sets whether the server should be exposed to external access as an
    /// optional value.
    pub fn expose_option(mut self, expose: Option<bool>) -> Self {
        self.expose = expose;
        self
    }

    /// Sets whether to print access logs.
    pub fn print_access_log(mut self, enabled: bool) -> Self {
        self.print_access_log = Some(enabled);
        self
    }

    /// Sets whether to print access logs as an optional value.
    pub fn print_access_log_option(mut self, enabled: Option<bool>) -> Self {
        self.print_access_log = enabled;
        self
    }

    /// Sets the directory the fixture files are loaded from. Defaults to
    /// `fixtures` in the working directory.
    pub fn fixture_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.fixture_dir = Some(path.into());
        self
    }

    /// Sets the fixture directory as an optional value.
    pub fn fixture_dir_option(mut self, path: Option<PathBuf>) -> Self {
        self.fixture_dir = path;
        self
    }

    /// Loads the fixture files and builds the `TaskMockServer` with the
    /// current settings. Fixture loading errors propagate out of this method,
    /// so a broken fixture directory aborts startup before the listener binds.
    pub fn build(self) -> Result<TaskMockServer, Box<dyn Error>> {
        let fixture_dir = self
            .fixture_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("fixtures"));

        let store = read_fixture_store(fixture_dir)?;
        self.build_with_state(Arc::new(FixtureStateManager::new(store)))
    }

    /// Builds the server around an already constructed state manager.
    pub(crate) fn build_with_state<S>(
        self,
        state: Arc<S>,
    ) -> Result<FixtureServer<FixtureHandler<S>>, Box<dyn Error>>
    where
        S: StateManager + Send + Sync + 'static,
    {
        let handler = FixtureHandler::new(state);

        Ok(FixtureServer::new(
            Box::new(handler),
            FixtureServerConfig {
                static_port: self.port,
                expose: self.expose.unwrap_or(false),
                print_access_log: self.print_access_log.unwrap_or(false),
            },
        )?)
    }
}

impl Default for FixtureServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
