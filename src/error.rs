use std::fmt::{Display, Formatter};

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// Attach a lazily built message to an error.
pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

#[derive(Debug)]
pub struct WithContextError {
    pub context: String,
    pub source: DynError,
}

impl Display for WithContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl std::error::Error for WithContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            Box::new(WithContextError {
                context: f(),
                source: e.into(),
            }) as DynError
        })
    }
}

#[derive(Debug)]
pub struct SimpleError(pub String);

impl SimpleError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl Display for SimpleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SimpleError {}

pub fn simple_error(msg: impl Into<String>) -> DynError {
    Box::new(SimpleError::new(msg))
}

/// A settings line whose value does not fit its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSetting {
    pub key: String,
    pub value: String,
    pub expected: &'static str,
}

impl Display for InvalidSetting {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: expected {}, got {:?}", self.key, self.expected, self.value)
    }
}

impl std::error::Error for InvalidSetting {}

pub fn invalid_setting(key: &str, value: &str, expected: &'static str) -> DynError {
    Box::new(InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_ctx_prefixes_message_and_keeps_source() {
        let res: std::result::Result<u64, std::num::ParseIntError> = "abc".parse::<u64>();
        let err = res.with_ctx(|| "debounce_ms".to_string()).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("debounce_ms: "), "got {text}");
        assert!(std::error::Error::source(&*err).is_some());
    }

    #[test]
    fn simple_error_displays_message() {
        let err = simple_error("store offline");
        assert_eq!(err.to_string(), "store offline");
    }

    #[test]
    fn invalid_setting_names_key_and_value() {
        let err = invalid_setting("refilter_after_refresh", "maybe", "true or false");
        assert_eq!(
            err.to_string(),
            "refilter_after_refresh: expected true or false, got \"maybe\""
        );
        assert!(err.downcast_ref::<InvalidSetting>().is_some());
    }
}
