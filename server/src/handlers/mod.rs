//! HTTP request handlers, one module per production mode family.

pub mod chunked;
pub mod delayed;
pub mod failing;
pub mod stream_ai;

pub use chunked::delayed_body;
pub use delayed::{delayed, delayed_cancel};
pub use failing::{throw_error, throw_error_body};
pub use stream_ai::stream_ai;
