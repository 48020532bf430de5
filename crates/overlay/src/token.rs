//! Fetch tokens: stale-result detection by comparison.

use std::fmt;

/// Identifies one issued fetch. Tokens from one [`TokenSource`] increase
/// strictly, so a result is stale whenever its token is not the latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchToken(u64);

impl FetchToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FetchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tokens and remembers which one is current.
#[derive(Debug, Default)]
pub struct TokenSource {
    last_issued: u64,
    current: Option<FetchToken>,
}

impl TokenSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, superseding any current one.
    pub fn issue(&mut self) -> FetchToken {
        self.last_issued += 1;
        let token = FetchToken(self.last_issued);
        self.current = Some(token);
        token
    }

    /// Leave no token current; every outstanding result becomes stale.
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<FetchToken> {
        self.current
    }

    pub fn is_current(&self, token: FetchToken) -> bool {
        self.current == Some(token)
    }

    /// Retire `token` once its result has been applied. A no-op for any
    /// other token.
    pub fn complete(&mut self, token: FetchToken) -> bool {
        if self.is_current(token) {
            self.current = None;
            true
        } else {
            false
        }
    }
}
