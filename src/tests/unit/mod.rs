//! Briefing Unit Tests
//!
//! Uses wiremock for HTTP mocking to test:
//! - Sheet requests and failure containment
//! - Fallback decisions over real fetches
//! - Dossier assembly from sheet-shaped input

mod resilience_tests;
mod source_tests;
