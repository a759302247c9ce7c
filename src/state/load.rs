/// View state for a fetched resource.
///
/// A screen backed by this type is always in exactly one of the three
/// states; there is no "empty but fine" fourth case. New fetches replace
/// the whole value with `Loading`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Success(T),
    Error { message: String },
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// The loaded value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            LoadState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadState::Error { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_are_mutually_exclusive() {
        let loading: LoadState<u32> = LoadState::Loading;
        assert!(loading.is_loading());
        assert!(loading.value().is_none());
        assert!(loading.error_message().is_none());

        let success = LoadState::Success(7u32);
        assert!(!success.is_loading());
        assert_eq!(success.value(), Some(&7));
        assert!(success.error_message().is_none());

        let error: LoadState<u32> = LoadState::Error { message: "boom".to_string() };
        assert!(!error.is_loading());
        assert!(error.value().is_none());
        assert_eq!(error.error_message(), Some("boom"));
    }
}
