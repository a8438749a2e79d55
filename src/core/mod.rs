pub mod briefing;
pub mod logging;
