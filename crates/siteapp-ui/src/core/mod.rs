//! Core, DOM-free primitives for the request helpers.
pub mod indicator;
pub mod modal;
pub mod ports;
pub mod request;
pub mod response;
pub mod scroll;

#[cfg(test)]
pub(crate) mod testing;
