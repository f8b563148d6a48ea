use uuid::Uuid;

/// Generate a fresh record id.
///
/// UUID v7 keeps ids ordered by creation time while staying unique for
/// records created within the same millisecond.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}
