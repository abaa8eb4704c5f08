//! Prelude module for convenient imports

pub use super::ai_jobs::Entity as AiJobs;
pub use super::contest_entries::Entity as ContestEntries;
pub use super::contests::Entity as Contests;
pub use super::meme_packs::Entity as MemePacks;
pub use super::payments::Entity as Payments;
pub use super::ref_earnings::Entity as RefEarnings;
pub use super::referrals::Entity as Referrals;
pub use super::users::Entity as Users;
pub use super::votes::Entity as Votes;
