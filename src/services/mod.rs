// Business logic behind the HTTP handlers

pub mod ai_service;
pub mod contest_service;
pub mod health;
pub mod money;
pub mod payment_service;
pub mod payout;
pub mod pricing_service;
pub mod referral_service;
pub mod user_service;
pub mod validation;
