//! Entity module for database models

pub mod ai_jobs;
pub mod contest_entries;
pub mod contests;
pub mod meme_packs;
pub mod payments;
pub mod prelude;
pub mod ref_earnings;
pub mod referrals;
pub mod users;
pub mod votes;
