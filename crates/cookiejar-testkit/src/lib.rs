//! # Cookie Jar Testkit
//!
//! Testing utilities for the cookie-jar family.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known addresses and payload hashes that every
//!   implementation must reproduce
//! - **Generators**: Proptest strategies, including a reference model of a jar
//! - **Fixtures**: An identity with a client wired to an in-memory devnet
//!
//! ## Golden Vectors
//!
//! ```rust
//! use cookiejar_testkit::vectors::{address_vectors, verify_all_vectors};
//!
//! verify_all_vectors().unwrap();
//! for vector in address_vectors() {
//!     println!("{:?} -> {}", vector.identity, vector.address);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use cookiejar_testkit::generators::JarScript;
//!
//! proptest! {
//!     #[test]
//!     fn rejected_actions_leave_no_jar(script: JarScript) {
//!         let (accepted, count) = script.expected();
//!         if !accepted.contains(&true) {
//!             prop_assert_eq!(count, None);
//!         }
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use cookiejar_testkit::fixtures::TestFixture;
//!
//! async fn example() {
//!     let fixture = TestFixture::new();
//!     fixture.client.bake(5).await.unwrap();
//!     assert_eq!(fixture.stored_count().as_deref(), Some("5"));
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, seeded_keypair, test_config, TestFixture};
pub use generators::JarScript;
pub use vectors::{address_vectors, payload_vectors, verify_all_vectors, AddressVector, PayloadVector};
