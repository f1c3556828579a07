//! Common test utilities and mock implementations

pub mod test_utils;

pub use mock_interface::Operation;
pub use test_utils::{assert_float_eq, create_mock_driver};
