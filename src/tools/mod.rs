//! Installers for the build's external tools.
//!
//! Each `ensure_*` function is idempotent except [`ensure_porter`], which
//! always fetches the latest release. The Go toolchain check lives in
//! [`crate::goversion`] and is re-exported here so build scripts can gate on
//! everything from one place.

pub mod gh;
pub mod kind;
pub mod mage;
pub mod porter;

pub use crate::goversion::enforce_go_version;
pub use gh::ensure_github_client;
pub use kind::ensure_kind;
pub use mage::ensure_mage;
pub use porter::ensure_porter;
