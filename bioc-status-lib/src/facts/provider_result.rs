use std::sync::Arc;

/// Outcome of a per-package lookup.
#[derive(Debug, Clone)]
pub enum ProviderResult<T> {
    /// The lookup succeeded.
    Found(T),

    /// The information cannot be determined for this package, with the reason.
    Unknown(String),

    /// The lookup failed.
    Error(Arc<ohno::AppError>),
}

impl<T> ProviderResult<T> {
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    #[must_use]
    pub const fn as_ref(&self) -> Option<&T> {
        match self {
            Self::Found(data) => Some(data),
            _ => None,
        }
    }
}
