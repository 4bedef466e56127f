//! Mask command - format, strip or obfuscate a value with a display mask

use anyhow::Result;
use cardkit_lib::formatter::Mask;

use crate::ui;

/// What to do with the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskMode {
    Apply,
    Remove,
    Obfuscate,
}

/// Transform `value` with `pattern`.
pub fn transform(pattern: &str, value: &str, mode: MaskMode) -> String {
    let mask = Mask::parse(pattern);
    match mode {
        MaskMode::Apply => mask.apply(value),
        MaskMode::Remove => mask.remove(value),
        MaskMode::Obfuscate => mask.obfuscate(value),
    }
}

pub fn run(pattern: &str, value: &str, mode: MaskMode, json: bool) -> Result<()> {
    let result = transform(pattern, value, mode);

    if json {
        ui::json(&serde_json::json!({
            "mask": pattern,
            "input": value,
            "output": result,
        }));
    } else {
        ui::key_value("Mask", pattern);
        ui::key_value("Slots", &Mask::parse(pattern).slot_count().to_string());
        ui::key_value("Result", &result);
    }
    Ok(())
}
