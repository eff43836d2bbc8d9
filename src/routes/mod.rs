pub mod checkin;
pub mod loyalty;
pub mod nudge;
