//! Stack limits for recursive tree walks
//!
//! Lowering and predecessor resolution recurse once per nesting level of the
//! Java source. Deep but valid code (long `else if` chains, thousand-term
//! string concatenations) would overflow a default 2 MiB thread stack, and
//! rayon workers get the same small stack. Every recursive entry point runs
//! through [`ensure_stack`], which switches to a fresh heap-allocated segment
//! when the remaining stack falls below the red zone.
//!
//! Recursion is still bounded: the resolver stops at
//! `FlowGraphConfig::max_resolution_depth` and reports
//! `ResolutionDepthExceeded`.

/// Remaining stack below which a new segment is allocated
pub const STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each additional stack segment
pub const STACK_SEGMENT_SIZE: usize = 4 * 1024 * 1024;

/// Run `f`, growing the stack first if it is nearly exhausted
#[inline]
pub fn ensure_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, f)
}
