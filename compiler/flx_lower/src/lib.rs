//! Body lowering for flx functions.
//!
//! Runs after declarations and before function analysis. Each function body
//! is rewritten in place, children first:
//!
//! 1. **Compound assignments**: `a op= b` becomes `a = a op b`, with any
//!    side effect in the destination's subscript saved to a temporary so it
//!    still happens once.
//! 2. **Basic subscripts**: the Basic parser reads `a(i)` as a call; when `a`
//!    is a pointer or array it becomes the one-based subscript `a[i - 1]`.
//! 3. **Counting loops**: every `CountRepeat` becomes a canonical `For`.
//!
//! [`lower_function`] then runs the coercion walker over the lowered body.
//!
//! # Pipeline Position
//!
//! ```text
//! Parse → Declare → **Lower** (+ coercion) → Function analysis → Inference
//! ```

mod lower;

pub use lower::{lower_body, lower_function, lower_module};
