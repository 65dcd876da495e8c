//! The interface between the engine and the arcs: the [`Arc`] trait, its scheduling metadata,
//! and the contexts through which arcs observe and mutate domains.

mod arc;
mod arc_id;
mod constructor;
pub(crate) mod contexts;
mod delta;
mod local_id;

pub use arc::Arc;
pub use arc::EnqueueDecision;
pub use arc::Priority;
pub use arc_id::ArcId;
pub use constructor::ArcBuilder;
pub use constructor::ArcRegistrationContext;
pub use contexts::PropagationContextMut;
pub use delta::Delta;
pub use local_id::LocalId;
