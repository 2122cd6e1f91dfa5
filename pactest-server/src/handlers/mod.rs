pub mod eval;
pub mod pac;
pub mod system;

use pactest_core::PacError;
use serde_json::{Map, Value};

use crate::infra::errors::{AppError, AppResult};

/// Runs every field check and reports all failures together as one 400.
pub(crate) fn check_fields<const N: usize>(
    checks: [(&str, pactest_core::Result<()>); N],
) -> AppResult<()> {
    let mut failures = Map::new();
    for (field, outcome) in checks {
        match outcome {
            Ok(()) => {}
            Err(PacError::Validation(message)) => {
                failures.insert(field.to_string(), Value::from(vec![message]));
            }
            Err(other) => return Err(other.into()),
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(failures))
    }
}
