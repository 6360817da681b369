//! Who is acting, and through which entry point.
//!
//! Every handler takes a `CommandMetadata` next to its command instead of
//! loose user and role parameters.

use std::fmt;

use super::{AuthenticatedUser, Role, UserId};

/// Entry point a command arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandSource {
    /// Constructed in-process (tests, maintenance tasks).
    #[default]
    Internal,
    /// Decoded from an authenticated HTTP request.
    Http,
}

impl fmt::Display for CommandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommandSource::Internal => "internal",
            CommandSource::Http => "http",
        })
    }
}

/// The acting user for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMetadata {
    pub actor: AuthenticatedUser,
    source: CommandSource,
}

impl CommandMetadata {
    pub fn new(actor: AuthenticatedUser) -> Self {
        Self {
            actor,
            source: CommandSource::Internal,
        }
    }

    /// Builder: mark the command as coming from the HTTP surface.
    pub fn via_http(mut self) -> Self {
        self.source = CommandSource::Http;
        self
    }

    pub fn user_id(&self) -> &UserId {
        &self.actor.id
    }

    pub fn role(&self) -> Role {
        self.actor.role
    }

    pub fn source(&self) -> CommandSource {
        self.source
    }
}
