use backtrace::Backtrace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidUrl,
    InvalidMethod,
    InvalidArgument,

    NetworkError,
    Timeout,
    HttpClientError,

    BodyReadError,

    Canceled,
    UnexpectedError,
}

impl ErrorKind {
    /// Rejected before any network activity took place.
    pub fn is_input(&self) -> bool {
        matches!(self, ErrorKind::InvalidUrl | ErrorKind::InvalidMethod | ErrorKind::InvalidArgument)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ErrorKind::NetworkError | ErrorKind::Timeout | ErrorKind::HttpClientError)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidUrl => write!(fmt, "invalid url"),
            ErrorKind::InvalidMethod => write!(fmt, "invalid method"),
            ErrorKind::InvalidArgument => write!(fmt, "invalid argument"),

            ErrorKind::NetworkError => write!(fmt, "network error"),
            ErrorKind::Timeout => write!(fmt, "timeout"),
            ErrorKind::HttpClientError => write!(fmt, "http client error"),

            ErrorKind::BodyReadError => write!(fmt, "body read error"),

            ErrorKind::Canceled => write!(fmt, "canceled"),
            ErrorKind::UnexpectedError => write!(fmt, "unexpected error"),
        }
    }
}

pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
            backtrace: Backtrace::new_unresolved(),
        }
    }

    pub fn message<S: AsRef<str>>(mut self, message: S) -> Self {
        self.message = Some(message.as_ref().to_string());
        self
    }

    pub fn source<E: Into<Box<dyn std::error::Error + Send + Sync>>>(mut self, source: E) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = fmt.debug_struct("Error");

        debug.field("kind", &self.kind);

        if let Some(message) = &self.message {
            debug.field("message", message);
        }

        if let Some(source) = &self.source {
            debug.field("source", source);
        }

        debug.field("backtrace", &format_args!("{:?}", self.backtrace));

        debug.finish()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(message) = &self.message {
            write!(fmt, "{}: {}", self.kind, message)
        } else {
            write!(fmt, "{}", self.kind)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|s| &**s as &(dyn std::error::Error + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::new(ErrorKind::Timeout).message("HTTP request timed out").source(e)
        } else if e.is_connect() {
            Error::new(ErrorKind::NetworkError).message("failed to connect").source(e)
        } else if e.is_body() || e.is_decode() {
            Error::new(ErrorKind::BodyReadError).message("failed to read response body").source(e)
        } else {
            Error::new(ErrorKind::HttpClientError).message("HTTP request failed").source(e)
        }
    }
}
