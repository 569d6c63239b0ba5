/// Remote data in one of its four states.
///
/// Replaces a `loading: bool` + `data: Option<T>` pair. The feedback form
/// keeps its category metadata in one of these so the view can tell
/// "still loading" apart from "loaded, but empty" and "failed".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resource<T, E = String> {
    /// No request has been made yet
    NotAsked,
    /// Request is in progress
    Loading,
    /// Request succeeded with data
    Success(T),
    /// Request failed with error
    Failure(E),
}

impl<T, E> Resource<T, E> {
    pub fn from_result(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Resource::Success(data),
            Err(e) => Resource::Failure(e),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Resource::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Resource::Failure(_))
    }

    /// Borrow the data if loaded
    pub fn success(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Borrow the error if failed
    pub fn failure(&self) -> Option<&E> {
        match self {
            Resource::Failure(e) => Some(e),
            _ => None,
        }
    }
}

impl<T, E> Default for Resource<T, E> {
    fn default() -> Self {
        Resource::NotAsked
    }
}

impl<T, E> From<Result<T, E>> for Resource<T, E> {
    fn from(result: Result<T, E>) -> Self {
        Resource::from_result(result)
    }
}
