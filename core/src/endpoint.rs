//! The four remote functions the client talks to.

use std::fmt;

use crate::http::HttpMethod;

/// A remote endpoint on the functions host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    PostUser,
    PostVote,
    GetVotes,
    GetUsers,
}

impl Endpoint {
    /// Short label used in error messages, e.g. `postUser`.
    pub fn tag(self) -> &'static str {
        match self {
            Endpoint::PostUser => "postUser",
            Endpoint::PostVote => "postVote",
            Endpoint::GetVotes => "getVotes",
            Endpoint::GetUsers => "getUsers",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::PostUser => "/api/postUser",
            Endpoint::PostVote => "/api/postVote",
            Endpoint::GetVotes => "/api/getVotes",
            Endpoint::GetUsers => "/api/getUsers",
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Endpoint::PostUser | Endpoint::PostVote => HttpMethod::Post,
            Endpoint::GetVotes | Endpoint::GetUsers => HttpMethod::Get,
        }
    }

    /// Whether the URL builder may append the access code.
    ///
    /// `GetUsers` answers false, but it never goes through the builder: its
    /// URL is the raw base joined with the path.
    pub fn appends_access_code(self) -> bool {
        matches!(self, Endpoint::PostUser | Endpoint::PostVote)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
