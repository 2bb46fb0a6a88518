use crate::error::TokenError;
use std::{
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
};

/// Source of the current session's bearer token. `Ok(None)` means there is
/// no session, which is not an error.
pub trait TokenStore: Debug {
    fn get_token(&self) -> Result<Option<String>, TokenError>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticTokenStore {
    token: Option<String>,
}

impl StaticTokenStore {
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn empty() -> Self {
        Self { token: None }
    }
}

impl TokenStore for StaticTokenStore {
    fn get_token(&self) -> Result<Option<String>, TokenError> {
        Ok(self.token.clone())
    }
}

/// A token that can be replaced at runtime, e.g. after a login call.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token<S: Into<String>>(&self, token: S) -> Result<(), TokenError> {
        *self.token.write().map_err(|_| TokenError::PoisonedLock)? = Some(token.into());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), TokenError> {
        *self.token.write().map_err(|_| TokenError::PoisonedLock)? = None;
        Ok(())
    }
}

impl TokenStore for MemoryTokenStore {
    fn get_token(&self) -> Result<Option<String>, TokenError> {
        Ok(self
            .token
            .read()
            .map_err(|_| TokenError::PoisonedLock)?
            .clone())
    }
}

/// Reads the token from a file on every call. A missing or blank file means
/// no session; any other read failure is reported.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get_token(&self) -> Result<Option<String>, TokenError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let token = contents.trim();
        if token.is_empty() {
            return Ok(None);
        }
        if token.contains(char::is_whitespace) {
            return Err(TokenError::Malformed);
        }

        Ok(Some(token.to_string()))
    }
}
