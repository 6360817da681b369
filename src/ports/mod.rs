//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `WbsRepository` - Reads projects, work packages and the dependency graph
//! - `ChangeRequestRepository` - Persists change requests and owns the review transaction
//! - `ChangeLogReader` - Reads the append-only audit trail
//!
//! ## Collaborator Ports
//!
//! - `NotificationGateway` - Best-effort announcements to teams and submitters
//! - `SessionValidator` - Resolves bearer tokens to users and roles

mod change_log_reader;
mod change_request_repository;
mod notification_gateway;
mod session_validator;
mod wbs_repository;

pub use change_log_reader::ChangeLogReader;
pub use change_request_repository::{ChangeRequestRepository, ReviewCommit};
pub use notification_gateway::{NotificationGateway, NotificationTarget};
pub use session_validator::SessionValidator;
pub use wbs_repository::WbsRepository;
