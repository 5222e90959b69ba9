//! Testing utilities and fixtures for codeplayground.
//!
//! - **Builders**: forests described by path
//! - **Fixtures**: playgrounds over in-memory, temporary JSON or
//!   write-refusing stores
//! - **Assertions**: checks for tree invariants and terminal output
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use playground_test_utils::{builders::ForestBuilder, fixtures::TestPlayground};
//!
//! #[tokio::test]
//! async fn test_rename() {
//!     let forest = ForestBuilder::new()
//!         .folder("/src/")
//!         .file("/src/main.js", "console.log(1)")
//!         .build();
//!
//!     let mut env = TestPlayground::memory().await;
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use builders::ForestBuilder;
pub use fixtures::{RejectingStorage, TestPlayground, TestStore};
