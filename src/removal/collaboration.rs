//! Collaboration backend used when a shared group is destroyed.

use crate::error::CollaborationError;

/// Backend for shared tab groups.
pub trait CollaborationService {
    /// Leave a collaboration the user joined.
    fn leave_group(&mut self, collaboration_id: &str) -> Result<(), CollaborationError>;

    /// Delete a collaboration the user owns, for every member.
    fn delete_group(&mut self, collaboration_id: &str) -> Result<(), CollaborationError>;
}
