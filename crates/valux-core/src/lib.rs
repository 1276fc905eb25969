#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Valux Core
//!
//! Foundational types shared by every valux crate: the structured [`Error`]
//! with its three gateway kinds (API, network, authentication) plus the local
//! kinds, the server response [`Envelope`], and [`ServiceHealth`] reports.

mod envelope;
mod error;
mod health;

pub use envelope::Envelope;
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use health::{ServiceHealth, ServiceStatus};
