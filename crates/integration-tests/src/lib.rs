//! Integration tests for Samovar.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p samovar-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart lifecycle against real on-disk storage
//! - `delivery_preferences` - Preference and address-book persistence
//! - `checkout_flow` - Draft assembly from live store state
//!
//! Tests marked `#[ignore]` additionally need a reachable backend
//! (`SAMOVAR_API_BASE_URL`) and, inside Telegram, `TELEGRAM_INIT_DATA`.
