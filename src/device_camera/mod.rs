pub mod impl_fake;
#[cfg(feature = "v4l2")]
pub mod impl_v4l2;
pub mod interface;
