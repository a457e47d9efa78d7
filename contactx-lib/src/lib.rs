//! Core of ContactX: a local, single-user contact book.
//!
//! The [`Repository`] persists contacts in an embedded database file, the
//! [`thumbnail`] module turns profile photos into display-sized images, and the
//! [`form`] and [`list`] modules hold the toolkit-independent state that a
//! frontend binds its widgets to.

use thiserror::Error;

pub mod config;
pub mod form;
pub mod fs;
pub mod list;
pub mod repository;
pub mod thumbnail;

pub use repository::Repository;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Repository(#[from] repository::Error),
    #[error(transparent)]
    Config(#[from] config::Error),
}
