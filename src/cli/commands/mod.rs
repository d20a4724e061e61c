//! CLI command implementations

pub mod datasets;
pub mod export;
pub mod init;
pub mod validate;

use crate::domain::MerkurError;

/// Map an engine error to the process exit code
///
/// 0 = success, 2 = configuration/validation, 3 = nothing to export,
/// 4 = data source failure, 5 = fatal.
pub(crate) fn exit_code_for(error: &MerkurError) -> i32 {
    match error {
        MerkurError::Validation(_) | MerkurError::Configuration(_) => 2,
        MerkurError::EmptyResult => 3,
        MerkurError::Source(_) => 4,
        _ => 5,
    }
}
