//! Argument vector construction

use crate::params::{ParamBag, ParamValue};

/// Build the CLI argument vector for `command`.
///
/// Entries are emitted in bag order: `true` becomes a bare flag, strings and
/// numbers become `key=value`, `false` and absent values are dropped.
/// Never fails; the caller is expected to have validated the bag.
pub fn build_args(command: &str, params: &ParamBag) -> Vec<String> {
    let mut args = Vec::with_capacity(params.len() + 1);
    args.push(command.to_string());

    for (key, value) in params.iter() {
        match value {
            ParamValue::Absent | ParamValue::Flag(false) => {}
            ParamValue::Flag(true) => args.push(key.to_string()),
            ParamValue::Text(s) => args.push(format!("{key}={s}")),
            ParamValue::Number(n) => args.push(format!("{key}={n}")),
            ParamValue::Structured(v) => args.push(format!("{key}={v}")),
        }
    }

    args
}
