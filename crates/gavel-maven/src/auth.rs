//! Repository authentication from the `username` / `password` config keys.

use reqwest::RequestBuilder;

use crate::repository::Repository;

/// How requests to a repository authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials<'a> {
    /// HTTP basic auth; the password may be absent.
    Basic {
        username: &'a str,
        password: Option<&'a str>,
    },
    /// A password configured without a username is a bearer token.
    Bearer(&'a str),
    Anonymous,
}

impl<'a> Credentials<'a> {
    pub fn of(repo: &'a Repository) -> Self {
        match (repo.username.as_deref(), repo.password.as_deref()) {
            (Some(username), password) => Self::Basic { username, password },
            (None, Some(token)) => Self::Bearer(token),
            (None, None) => Self::Anonymous,
        }
    }
}

/// Attach the repository's credentials, if any, to `request`.
pub fn apply_auth(request: RequestBuilder, repo: &Repository) -> RequestBuilder {
    match Credentials::of(repo) {
        Credentials::Basic { username, password } => request.basic_auth(username, password),
        Credentials::Bearer(token) => request.bearer_auth(token),
        Credentials::Anonymous => request,
    }
}
