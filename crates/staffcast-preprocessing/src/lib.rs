//! Feature preprocessing for StaffCast.
//!
//! Category codecs translate between string labels and the dense integer
//! codes the models train on; the standard scaler centers and scales the
//! assembled feature columns. Both are fitted once and immutable after.

pub mod codec;
pub mod scaler;

pub use codec::{CategoricalField, CategoryCodec, CodecSet, EncodeError, EncodeResult};
pub use scaler::{ScaleError, ScaleResult, StandardScaler};
