//! Error types for mesh analysis
//!
//! All errors carry a stable code so callers can categorize failures without
//! matching on message text.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: Mesh structure errors
//! - **E2xxx**: Settings errors
//! - **E3xxx**: Transform errors
//!
//! ## Error Codes
//!
//! - `E1001`: Malformed triangle soup
//! - `E1002`: Position/normal length mismatch
//! - `E1003`: Operation requires a non-empty mesh
//! - `E2001`: Invalid analysis setting
//! - `E3001`: Singular world transform
//!
//! Degenerate geometry and unparseable cost inputs are deliberately not
//! represented here: they degrade to "no contribution" instead of failing.

use thiserror::Error;

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or analyzing a mesh
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The triangle soup cannot be split into whole triangles
    ///
    /// **Error Code**: E1001
    ///
    /// **Common Causes**:
    /// - Flat component array length not a multiple of 9
    /// - Vertex count not a multiple of 3
    /// - Truncated loader output
    #[error("[E1001] Malformed mesh: {0}")]
    MalformedMesh(String),

    /// Position and normal arrays disagree in length
    ///
    /// **Error Code**: E1002
    ///
    /// **Suggestions**:
    /// - Ensure the loader emits one normal per vertex position
    /// - Use `TriangleMesh::with_face_normals` when the source has no normals
    #[error("[E1002] Position/normal length mismatch: {positions} positions, {normals} normals")]
    LengthMismatch {
        /// Number of position entries supplied
        positions: usize,
        /// Number of normal entries supplied
        normals: usize,
    },

    /// The operation needs at least one triangle
    ///
    /// **Error Code**: E1003
    #[error("[E1003] Empty mesh: {0}")]
    EmptyMesh(String),

    /// An analysis setting is out of range or not finite
    ///
    /// **Error Code**: E2001
    #[error("[E2001] Invalid setting: {0}")]
    InvalidSettings(String),

    /// The world transform cannot be inverted
    ///
    /// **Error Code**: E3001
    ///
    /// **Common Causes**:
    /// - Zero scale on one or more axes
    /// - Non-finite matrix entries
    #[error("[E3001] Singular transform: {0}")]
    SingularTransform(String),
}

impl Error {
    /// Create a MalformedMesh error describing the offending length
    ///
    /// # Arguments
    /// * `what` - The array being checked (e.g. "position components")
    /// * `len` - The length that was supplied
    /// * `multiple` - The length must be a multiple of this value
    ///
    /// # Example
    /// ```
    /// use printprep::Error;
    ///
    /// let err = Error::malformed_mesh("position components", 10, 9);
    /// assert!(err.to_string().contains("[E1001]"));
    /// ```
    pub fn malformed_mesh(what: &str, len: usize, multiple: usize) -> Self {
        Error::MalformedMesh(format!(
            "{} has length {}, which is not a multiple of {}. \
             Every triangle needs exactly three vertices.",
            what, len, multiple
        ))
    }

    /// Create an InvalidSettings error naming the setting and the rejected value
    ///
    /// # Arguments
    /// * `name` - The setting name (e.g. "column_width")
    /// * `value` - The rejected value
    /// * `expected` - What the setting requires (e.g. "a positive number")
    pub fn invalid_setting(name: &str, value: impl std::fmt::Display, expected: &str) -> Self {
        Error::InvalidSettings(format!(
            "'{}' must be {}, got {}",
            name, expected, value
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_in_messages() {
        let malformed = Error::MalformedMesh("test".to_string());
        assert!(malformed.to_string().contains("[E1001]"));

        let mismatch = Error::LengthMismatch {
            positions: 9,
            normals: 6,
        };
        assert!(mismatch.to_string().contains("[E1002]"));
        assert!(mismatch.to_string().contains("9 positions, 6 normals"));

        let empty = Error::EmptyMesh("bounding box".to_string());
        assert!(empty.to_string().contains("[E1003]"));

        let settings = Error::InvalidSettings("test".to_string());
        assert!(settings.to_string().contains("[E2001]"));

        let singular = Error::SingularTransform("zero scale".to_string());
        assert!(singular.to_string().contains("[E3001]"));
    }

    #[test]
    fn test_malformed_mesh_helper() {
        let err = Error::malformed_mesh("position components", 10, 9);
        let msg = err.to_string();
        assert!(msg.contains("position components"));
        assert!(msg.contains("length 10"));
        assert!(msg.contains("multiple of 9"));
    }

    #[test]
    fn test_invalid_setting_helper() {
        let err = Error::invalid_setting("column_width", -1.0, "a positive number");
        let msg = err.to_string();
        assert!(msg.contains("'column_width'"));
        assert!(msg.contains("a positive number"));
        assert!(msg.contains("-1"));
        assert!(msg.contains("[E2001]"));
    }
}
