//! The domain containers: interval-based and sparse numeric sets, generic over the scalar kind.

mod interval_set;
mod numeric_set;
mod numeric_value;
mod set_event;
mod sparse_set;

pub use interval_set::IntervalIter;
pub use interval_set::IntervalSet;
pub use interval_set::IntervalValueIter;
pub use numeric_set::NumericSet;
pub use numeric_value::NumericValue;
pub(crate) use numeric_value::max_of;
pub(crate) use numeric_value::min_of;
pub use set_event::SetEvent;
