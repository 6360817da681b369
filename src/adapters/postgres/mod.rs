//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! The schema is owned outside this crate. The adapters expect:
//!
//! | Table | Columns |
//! |-------|---------|
//! | `wbs_elements` | `car_number`, `project_number`, `work_package_number` (INT4, PK), `name`, `status` (TEXT), `project_lead_id`, `project_manager_id` (TEXT NULL), `date_deleted` (TIMESTAMPTZ NULL), `deleted_by_id` (TEXT NULL) |
//! | `projects` | `car_number`, `project_number` (PK), `summary`, `budget` (INT8), `rules`, `goals`, `features`, `other_constraints` (JSONB string arrays) |
//! | `teams` | `id` (UUID PK), `name`, `channel_id` (TEXT NULL) |
//! | `project_teams` | `car_number`, `project_number`, `team_id` |
//! | `work_packages` | WBS number (PK), `start_date` (DATE), `duration_weeks` (INT4), `expected_activities`, `deliverables` (JSONB) |
//! | `work_package_dependencies` | WBS number of the dependent, `depends_on_car_number`, `depends_on_project_number`, `depends_on_work_package_number` |
//! | `change_requests` | `id` (UUID PK), `submitter_id`, WBS number, `kind`, `date_submitted`, `accepted` (BOOL NULL), `reviewer_id`, `review_notes`, `date_reviewed`, `date_deleted`, `deleted_by_id`, `details` (JSONB) |
//! | `changes` | `seq` (BIGSERIAL), `id` (UUID), `change_request_id`, `implementer_id`, WBS number, `detail`, `date_implemented` |

mod change_log_reader;
mod change_request_repository;
mod rows;
mod wbs_repository;

pub use change_log_reader::PostgresChangeLogReader;
pub use change_request_repository::PostgresChangeRequestRepository;
pub use wbs_repository::PostgresWbsRepository;
