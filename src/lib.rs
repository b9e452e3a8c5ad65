// Public modules
pub mod types;
pub mod config;
pub mod error;
pub mod parsing;
pub mod directory;
pub mod classifier;
pub mod report;
pub mod render;
pub mod notifier;
pub mod run;

// Re-export commonly used items
pub use types::*;
pub use config::{load_config, load_config_with_env, EnvironmentProvider, SystemEnvironment, MockEnvironment};
pub use error::AuditError;
pub use parsing::{elapsed_days, exceeds, format_last_used};
pub use directory::{fetch_credential_records, IamDirectory, IdentityDirectory};
pub use classifier::{classify, classify_record};
pub use report::{AlertReport, ReportSummary};
pub use render::{render_error, render_report, RenderedReport, ALERT_SUBJECT, ERROR_SUBJECT};
pub use notifier::{notification_for, Notifier, SesNotifier, SlackNotifier};
pub use run::{audit, execute, AuditOutcome, InvocationResult};
