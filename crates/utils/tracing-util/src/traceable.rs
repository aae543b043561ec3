use std::convert::Infallible;

/// Who may see the details of an error recorded on a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorVisibility {
    Internal,
    User,
}

pub trait TraceableError: core::fmt::Display + core::fmt::Debug {
    fn visibility(&self) -> ErrorVisibility;

    fn description(&self) -> String {
        self.to_string()
    }

    fn details(&self) -> String {
        format!("{self:?}")
    }
}

impl TraceableError for Infallible {
    fn visibility(&self) -> ErrorVisibility {
        match *self {}
    }
}

/// A value produced inside a span whose error, if any, should be recorded on that span.
///
/// Operations that cannot fail are wrapped in [`Successful`].
pub trait Traceable {
    type ErrorType<'a>: TraceableError
    where
        Self: 'a;

    fn get_error(&self) -> Option<Self::ErrorType<'_>>;
}

/// A value which never carries an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Successful<T>(T);

impl<T> Successful<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Successful<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> Traceable for Successful<T> {
    type ErrorType<'a>
        = Infallible
    where
        Self: 'a;

    fn get_error(&self) -> Option<Self::ErrorType<'_>> {
        None
    }
}

/// Borrowed error of a [`Result`], used as the [`Traceable::ErrorType`] of `Result<T, E>`.
#[derive(Debug)]
pub struct ResultError<'e, E> {
    error: &'e E,
}

impl<E: std::fmt::Display> std::fmt::Display for ResultError<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.error.fmt(f)
    }
}

impl<E: TraceableError> TraceableError for ResultError<'_, E> {
    fn visibility(&self) -> ErrorVisibility {
        self.error.visibility()
    }

    fn description(&self) -> String {
        self.error.description()
    }

    fn details(&self) -> String {
        self.error.details()
    }
}

impl<R, E> Traceable for Result<R, E>
where
    E: TraceableError,
{
    type ErrorType<'a>
        = ResultError<'a, E>
    where
        R: 'a,
        E: 'a;

    fn get_error(&self) -> Option<ResultError<'_, E>> {
        self.as_ref().err().map(|error| ResultError { error })
    }
}
