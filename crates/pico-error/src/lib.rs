use std::borrow::Cow;
use std::collections::TryReserveError;
use std::fmt::{self, Display, Formatter};
use std::ops::Deref;
use std::sync::{Arc, LazyLock};
use std::{env, io};

enum ErrorStrategy {
    Panic,
    WithBacktrace,
    Normal,
}

static ERROR_STRATEGY: LazyLock<ErrorStrategy> = LazyLock::new(|| {
    if env::var("PICO_PANIC_ON_ERR").as_deref() == Ok("1") {
        ErrorStrategy::Panic
    } else if env::var("PICO_BACKTRACE_IN_ERR").as_deref() == Ok("1") {
        ErrorStrategy::WithBacktrace
    } else {
        ErrorStrategy::Normal
    }
});

#[derive(Debug)]
pub struct ErrString(Cow<'static, str>);

impl ErrString {
    pub const fn new_static(s: &'static str) -> Self {
        Self(Cow::Borrowed(s))
    }
}

impl<T> From<T> for ErrString
where
    T: Into<Cow<'static, str>>,
{
    fn from(msg: T) -> Self {
        match &*ERROR_STRATEGY {
            ErrorStrategy::Panic => panic!("{}", msg.into()),
            ErrorStrategy::WithBacktrace => ErrString(Cow::Owned(format!(
                "{}\n\nRust backtrace:\n{}",
                msg.into(),
                std::backtrace::Backtrace::force_capture()
            ))),
            ErrorStrategy::Normal => ErrString(msg.into()),
        }
    }
}

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PicoError {
    #[error("not an Arrow file: {0}")]
    NotArrowFile(ErrString),
    #[error("out-of-spec: {0}")]
    OutOfSpec(ErrString),
    #[error("misaligned: {0}")]
    Misaligned(ErrString),
    #[error("schema mismatch: {0}")]
    SchemaMismatch(ErrString),
    #[error("unsupported: {0}")]
    Unsupported(ErrString),
    #[error("nesting too deep: {0}")]
    NestingTooDeep(ErrString),
    #[error("{}", match msg {
        Some(msg) => format!("{msg}"),
        None => format!("{error}")
    })]
    Io {
        error: Arc<io::Error>,
        msg: Option<ErrString>,
    },
}

impl From<io::Error> for PicoError {
    fn from(value: io::Error) -> Self {
        PicoError::Io {
            error: Arc::new(value),
            msg: None,
        }
    }
}

impl From<simdutf8::basic::Utf8Error> for PicoError {
    fn from(value: simdutf8::basic::Utf8Error) -> Self {
        pico_err!(OutOfSpec: "invalid utf8: {}", value)
    }
}

#[cfg(feature = "arrow-format")]
impl From<arrow_format::ipc::planus::Error> for PicoError {
    fn from(err: arrow_format::ipc::planus::Error) -> Self {
        pico_err!(OutOfSpec: "invalid flatbuffer: {err:?}")
    }
}

impl From<TryReserveError> for PicoError {
    fn from(value: TryReserveError) -> Self {
        pico_err!(OutOfSpec: "allocation of an untrusted size failed: {}", value)
    }
}

pub type PicoResult<T> = Result<T, PicoError>;

impl PicoError {
    pub fn wrap_msg<F: FnOnce(&str) -> String>(&self, func: F) -> Self {
        use PicoError::*;
        match self {
            NotArrowFile(msg) => NotArrowFile(func(msg).into()),
            OutOfSpec(msg) => OutOfSpec(func(msg).into()),
            Misaligned(msg) => Misaligned(func(msg).into()),
            SchemaMismatch(msg) => SchemaMismatch(func(msg).into()),
            Unsupported(msg) => Unsupported(func(msg).into()),
            NestingTooDeep(msg) => NestingTooDeep(func(msg).into()),
            Io { error, msg } => {
                let msg = match msg {
                    Some(msg) => func(msg),
                    None => func(&format!("{error}")),
                };
                Io {
                    error: error.clone(),
                    msg: Some(msg.into()),
                }
            },
        }
    }
}

#[macro_export]
macro_rules! pico_err {
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__private::must_use(
            $crate::PicoError::$variant(format!($fmt, $($arg),*).into())
        )
    };
    ($variant:ident: $err:expr $(,)?) => {
        $crate::__private::must_use(
            $crate::PicoError::$variant($err.into())
        )
    };
    (oos = $($tt:tt)+) => {
        $crate::pico_err!(OutOfSpec: "{}", $($tt)+)
    };
}

#[macro_export]
macro_rules! pico_bail {
    ($($tt:tt)+) => {
        return Err($crate::pico_err!($($tt)+))
    };
}

#[macro_export]
macro_rules! pico_ensure {
    ($cond:expr, $($tt:tt)+) => {
        if !$cond {
            $crate::pico_bail!($($tt)+);
        }
    };
}

#[inline]
#[cold]
#[must_use]
pub fn to_out_of_spec_err(err: impl Display) -> PicoError {
    PicoError::OutOfSpec(err.to_string().into())
}

// Not public, referenced by macros only.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    #[inline]
    #[cold]
    #[must_use]
    pub fn must_use(error: crate::PicoError) -> crate::PicoError {
        error
    }
}
