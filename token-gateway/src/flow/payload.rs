use crate::errors::FlowError;
use crate::models::{Claims, EventPayload, ResourceRecord};

/// Returns the first source that holds a non-blank value
pub fn resolve_owner_id<'a, I>(sources: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    sources
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.trim().is_empty())
}

/// Merges the claims and the resource record into the published record.
///
/// Owner id order: the resource's `userId`, then the token subject, then the
/// preferred username.
pub fn assemble_payload(claims: &Claims, record: &ResourceRecord) -> Result<EventPayload, FlowError> {
    let user_id = resolve_owner_id([
        record.user_id.as_deref(),
        claims.subject.as_deref(),
        claims.preferred_username.as_deref(),
    ])
    .ok_or(FlowError::IdentityResolution)?;

    Ok(EventPayload {
        user_id: user_id.to_string(),
        user: claims.clone(),
        transactions: record.transactions.clone(),
    })
}
