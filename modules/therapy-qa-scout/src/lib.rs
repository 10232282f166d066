pub mod builder;
pub mod driver;
pub mod export;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
