use proptest::prelude::*;

use tabconv::detect::{signature, structure};
use tabconv::{extract_extension, ConvertError, Format};

proptest! {
    #[test]
    fn test_names_without_letter_suffix_have_no_extension(
        stem in "[a-zA-Z0-9_]{0,12}",
        tail in prop_oneof![
            Just(String::new()),
            "\\.[A-Z0-9]{1,4}",
            "\\.[a-z]{1,4}[0-9]",
            "[0-9]{1,3}",
        ],
    ) {
        let name = format!("{}{}", stem, tail);
        let is_missing = matches!(
            extract_extension(&name),
            Err(ConvertError::NoExtensionFound { .. })
        );
        prop_assert!(is_missing, "{} should have no extension", name);
    }

    #[test]
    fn test_lowercase_suffix_is_extracted(stem in "[a-zA-Z0-9_]{1,12}", ext in "[a-z]{1,6}") {
        let name = format!("{}.{}", stem, ext);
        prop_assert_eq!(extract_extension(&name).unwrap(), ext);
    }

    #[test]
    fn test_unknown_tokens_are_unsupported(token in "[a-z]{1,8}") {
        prop_assume!(Format::ALL.iter().all(|f| f.token() != token));
        let is_unsupported = matches!(
            Format::from_token(&token),
            Err(ConvertError::UnsupportedExtension { .. })
        );
        prop_assert!(is_unsupported);
    }

    #[test]
    fn test_rows_with_equal_comma_counts_are_consistent(
        commas in 0usize..6,
        cells in prop::collection::vec("[a-z0-9 ]{0,5}", 1..20),
    ) {
        let lines: Vec<String> = cells
            .iter()
            .map(|cell| vec![cell.as_str(); commas + 1].join(","))
            .collect();
        prop_assert!(structure::check_line_consistency(&lines));
    }

    #[test]
    fn test_one_extra_comma_is_found(
        commas in 0usize..6,
        rows in 2usize..20,
        bad in 1usize..20,
    ) {
        let bad = bad % rows;
        prop_assume!(bad > 0);
        let mut lines: Vec<String> = (0..rows).map(|_| ",".repeat(commas)).collect();
        lines[bad].push(',');
        let found = structure::first_inconsistent_line(&lines).unwrap();
        prop_assert_eq!(found.line, bad + 1);
        prop_assert!(!structure::check_line_consistency(&lines));
    }

    #[test]
    fn test_signature_iff_comma(content in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assert_eq!(signature::matches(&content), content.contains(&b','));
    }
}
