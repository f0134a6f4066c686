use std::{
    net::SocketAddr,
    path::PathBuf,
    thread::{self, JoinHandle},
};

use taskmock::FixtureServerBuilder;
use tokio::sync::oneshot;

/// Boots a fixture server on an ephemeral port in a background thread and
/// shuts it down on drop. Every test starts its own server, so mutations from
/// one test never leak into another.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl TestServer {
    pub fn start() -> Self {
        let _ = env_logger::try_init();

        let (addr_tx, addr_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let join = thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("cannot build test runtime");

            runtime.block_on(async move {
                let server = FixtureServerBuilder::new()
                    .fixture_dir(fixture_dir())
                    .build()
                    .expect("cannot build fixture server");

                server
                    .start_with_signals(Some(addr_tx), async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .expect("fixture server failed");
            });
        });

        let addr = addr_rx
            .blocking_recv()
            .expect("server did not publish its address");

        TestServer {
            addr,
            shutdown: Some(shutdown_tx),
            join: Some(join),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}
