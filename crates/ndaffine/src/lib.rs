#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use ndaffine_tensor as tensor;

#[doc(inline)]
pub use ndaffine_imgproc as imgproc;
