pub mod builder;
pub mod fixtures;
pub mod handler;
pub mod server;
pub mod state;

/// The fully assembled fixture server as produced by the builder.
pub type TaskMockServer =
    server::FixtureServer<handler::FixtureHandler<state::FixtureStateManager>>;
