#[cfg(any(test, feature = "fake-detector"))]
pub mod impl_fake;
pub mod impl_http;
pub mod interface;
