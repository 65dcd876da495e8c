mod propagation_status;

pub use propagation_status::EmptyDomain;
pub use propagation_status::PropagationFailure;
pub use propagation_status::PropagationStatus;
pub use propagation_status::SetOperationError;
