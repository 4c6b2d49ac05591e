use bson::oid::ObjectId;

use nexthire_core::error::RepoError;

/// Parse a hex identifier from a request path.
pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId, RepoError> {
    ObjectId::parse_str(id).map_err(|_| RepoError::InvalidId(id.to_string()))
}
