//! Domain entities for the auth core.

pub mod lockout;
pub mod session;
pub mod stamp;
pub mod subject;
pub mod token;

pub use lockout::{BruteForceCounter, GuardScope};
pub use session::{Session, SessionStatus};
pub use stamp::AuditStamp;
pub use subject::{AuthSubject, Role};
pub use token::{Claims, TYP_ACCESS, TYP_REFRESH};
