use uuid::Uuid;

/// A new record id: a random (v4) UUID rendered as 32 lowercase hex digits
/// with the hyphens stripped.
#[must_use]
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}
