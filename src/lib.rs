//! Arclight is a constraint propagation core: interval-compressed numeric domains, directed
//! propagation rules ("arcs") between them, and an engine that schedules arcs to a fixpoint.
//!
//! The crate provides the three layers a solving front end builds on:
//! - [`sets`]: the domain containers. An interval-backed set stores runs of consecutive values
//!   in an arena with free-slot recycling; a sparse set stores individual values. Both report
//!   fine-grained change events.
//! - [`engine`]: nodes wrapping the sets, classification of their changes, and the
//!   [`engine::PropagationEngine`] with its coalescing priority queue.
//! - [`arcs`]: the concrete propagation rules, from ternary arithmetic over sums, products and
//!   quotients through power, log and trigonometric coupling to range, membership,
//!   set-combination and three-valued boolean reasoning.
//!
//! Everything is generic over the scalar kind of the domains ([`sets::NumericValue`], backed by
//! `i32`, `i64`, `f32` and `f64`), so the same arc code performs truncating integer reasoning
//! and outward-rounded real reasoning.
//!
//! ```
//! use arclight::arcs::{RelOp, TernaryProductBuilder};
//! use arclight::engine::PropagationEngine;
//!
//! let mut engine: PropagationEngine<i32> = PropagationEngine::default();
//! let x = engine.new_interval_node(-10, 10);
//! let y = engine.new_interval_node(-10, 10);
//! let z = engine.new_interval_node(-100, 100);
//!
//! let _ = engine.add_arc(TernaryProductBuilder { x, y, z, op: RelOp::Eq });
//! engine.assign(y, 0).unwrap();
//! engine.propagate().unwrap();
//!
//! assert!(engine.is_bound(z));
//! assert_eq!(engine.min(z), 0);
//! ```

pub mod arcs;
#[doc(hidden)]
pub mod asserts;
pub mod basic_types;
pub mod containers;
pub mod engine;
pub(crate) mod math;
pub mod propagation;
pub mod sets;
