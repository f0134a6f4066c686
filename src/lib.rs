//! `taskmock` is a small mock HTTP server that stands in for a task
//! management backend while recording terminal demos or running integration
//! tests of a CLI. It serves canned JSON fixtures for a handful of REST-style
//! endpoints and applies a few scripted in-memory mutations on writes, so a
//! recorded session looks like it is talking to the real service.
//!
//! On startup the server reads `tasks.json`, `labels.json`, `projects.json`
//! and `sections.json` from a fixture directory into memory. GET requests are
//! answered from that store: collections come back wrapped in a
//! `{"results": [...], "next_cursor": null}` pagination envelope, single
//! items by id come back verbatim. POST requests accept anything and apply a
//! small set of hardcoded mutations (a canned task-creation reply, a rename,
//! marking a task closed) that keep a scripted demo consistent. Nothing is
//! ever written back to disk.
//!
//! # Getting Started
//!
//! Run the bundled binary against a fixture directory:
//!
//! ```bash
//! taskmock --port 3000 --fixture-dir fixtures
//! ```
//!
//! Or embed the server in a test on an ephemeral port:
//!
//! ```no_run
//! use taskmock::FixtureServerBuilder;
//! use tokio::sync::oneshot;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = FixtureServerBuilder::new()
//!     .fixture_dir("fixtures")
//!     .build()?;
//!
//! let (addr_tx, addr_rx) = oneshot::channel();
//! tokio::spawn(server.start_with_signals(Some(addr_tx), std::future::pending()));
//!
//! let addr = addr_rx.await?;
//! println!("fixture server listening on {}", addr);
//! # Ok(())
//! # }
//! ```
//!
//! # Debugging
//!
//! `taskmock` logs via the `tracing` crate. The binary installs a
//! `tracing-subscriber` honoring `RUST_LOG`; set `RUST_LOG=taskmock=debug`
//! to watch fixture loading and request routing.

pub mod server;

pub use server::{builder::FixtureServerBuilder, TaskMockServer};
