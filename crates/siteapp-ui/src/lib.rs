#![cfg_attr(not(target_arch = "wasm32"), forbid(unsafe_code))]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Browser-side request helpers for the site application.
//!
//! The [`core`] module is DOM-free: it owns the in-flight request counter, the
//! delayed loading indicator, control locking, and error classification, and is
//! driven through small collaborator traits so it can be exercised natively.
//! The `dom` module (wasm32 only) binds those traits to the page and exports the
//! JavaScript entry points.

pub mod config;
pub mod core;
pub mod error;
pub mod telemetry;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use crate::config::UiSettings;
pub use crate::core::indicator::{IndicatorController, UploadProgress};
pub use crate::core::modal::{ErrorModal, ModalBody};
pub use crate::core::request::{DefaultAction, Method, Payload, RequestDescriptor, RequestWrapper};
pub use crate::core::response::TransportFailure;
pub use crate::error::UiError;
