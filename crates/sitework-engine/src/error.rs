//! Error type for `sitework-engine`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain rule was violated (not-found, forbidden feed, taxonomy or
  /// diff failure). Carries the precise [`sitework_core::Error`].
  #[error(transparent)]
  Domain(#[from] sitework_core::Error),

  #[error("store error: {0}")]
  Store(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend-specific store error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
