//! Podman runtime driver.
//!
//! Project H.I.V.E talks to the container runtime the way the original
//! Python tier did: by shelling out to the `podman` CLI rather than
//! speaking a container engine's HTTP API. Rootless Podman exposes no
//! stable local socket across distributions, so the CLI is the only
//! portable surface.

mod image;
mod network;
mod process;
mod stderr;

pub use image::ImageManager;
pub use network::NetworkManager;
pub use process::PodmanRunner;

use thiserror::Error;

/// Errors raised by the runtime driver itself (not by the things that use it).
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("{0}")]
    CommandFailed(String),

    #[error("'{0}' executable not found — is Podman installed?")]
    BinaryMissing(String),

    #[error("command timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
