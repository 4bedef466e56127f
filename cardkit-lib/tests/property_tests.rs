//! Property-based tests for cardkit-lib

use cardkit_lib::formatter::{apply_mask, obfuscate, remove_mask, Mask};
use cardkit_lib::validation::luhn_checksum_valid;
use proptest::prelude::*;

const CARD_MASK: &str = "{{9999}} {{9999}} {{9999}} {{9999}}";

/// Append the Luhn check digit to `payload`.
fn with_check_digit(payload: &str) -> String {
    let sum: u32 = payload
        .chars()
        .rev()
        .enumerate()
        .map(|(i, c)| {
            let d = c.to_digit(10).unwrap();
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    format!("{payload}{}", (10 - sum % 10) % 10)
}

proptest! {
    /// Stripping a mask recovers the raw value that was formatted with it
    #[test]
    fn test_mask_round_trip(raw in "[0-9]{0,16}") {
        let masked = apply_mask(CARD_MASK, &raw);
        prop_assert_eq!(remove_mask(CARD_MASK, &masked), raw);
    }

    /// Formatting never yields more slot characters than the mask has slots
    #[test]
    fn test_mask_drops_surplus(raw in "[0-9]{0,40}") {
        let mask = Mask::parse("{{99}}/{{99}}");
        let stripped = mask.remove(&mask.apply(&raw));
        prop_assert!(stripped.len() <= mask.slot_count());
        prop_assert!(raw.starts_with(&stripped));
    }

    /// Typed separators are accepted as the mask's own literals
    #[test]
    fn test_typed_separators_are_consumed(groups in prop::collection::vec("[0-9]{4}", 1..=4)) {
        let typed = groups.join(" ");
        let masked = apply_mask(CARD_MASK, &typed);
        prop_assert_eq!(&masked, &typed);
        prop_assert_eq!(remove_mask(CARD_MASK, &masked), groups.concat());
    }

    /// Obfuscation hides every character but keeps the length
    #[test]
    fn test_obfuscate_hides_everything(value in "\\PC{0,32}") {
        let hidden = obfuscate(&value, None);
        prop_assert_eq!(hidden.chars().count(), value.chars().count());
        prop_assert!(hidden.chars().all(|c| c == '*'));
    }

    /// Luhn accepts generated card numbers and catches any single-digit typo
    #[test]
    fn test_luhn_detects_single_digit_errors(
        payload in "[0-9]{11,18}",
        position in any::<prop::sample::Index>(),
        delta in 1u32..10,
    ) {
        let pan = with_check_digit(&payload);
        prop_assert!(luhn_checksum_valid(&pan));

        let i = position.index(pan.len());
        let mut digits: Vec<char> = pan.chars().collect();
        let d = digits[i].to_digit(10).unwrap();
        digits[i] = char::from_digit((d + delta) % 10, 10).unwrap();
        let corrupted: String = digits.into_iter().collect();
        prop_assert!(!luhn_checksum_valid(&corrupted));
    }
}
