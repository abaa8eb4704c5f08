// Database repository management

mod ai_job_repository;
mod contest_repository;
mod payment_repository;
mod referral_repository;
mod user_repository;

pub use ai_job_repository::{AiJobRepository, NewAiJob, NewMemePack};
pub use contest_repository::{
    ClosedContest, ContestRepository, NewContest, CONTEST_ACTIVE, CONTEST_CLOSED,
};
pub use payment_repository::{
    CommissionRow, NewPayment, PaymentRepository, STATUS_CONFIRMED, STATUS_PENDING,
};
pub use referral_repository::ReferralRepository;
pub use user_repository::{UserChanges, UserRepository};

use sea_orm::DatabaseConnection;

/// Container for all database repositories
pub struct Repositories {
    pub user: UserRepository,
    pub payment: PaymentRepository,
    pub referral: ReferralRepository,
    pub contest: ContestRepository,
    pub ai_job: AiJobRepository,
}

impl Repositories {
    /// Creates a new repositories container with database connection
    pub fn new(conn: DatabaseConnection) -> Self {
        Repositories {
            user: UserRepository::new(conn.clone()),
            payment: PaymentRepository::new(conn.clone()),
            referral: ReferralRepository::new(conn.clone()),
            contest: ContestRepository::new(conn.clone()),
            ai_job: AiJobRepository::new(conn),
        }
    }
}
