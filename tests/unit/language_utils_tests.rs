/*!
 * Tests for language code utilities
 */

use weblingo::language_utils::{get_language_name, language_codes_match, validate_language_code};

#[test]
fn test_validateLanguageCode_withValidCodes_shouldAccept() {
    assert!(validate_language_code("en").is_ok());
    assert!(validate_language_code("de").is_ok());
    assert!(validate_language_code(" FR ").is_ok());
}

#[test]
fn test_validateLanguageCode_withInvalidCodes_shouldReject() {
    assert!(validate_language_code("zz").is_err());
    assert!(validate_language_code("deu").is_err());
    assert!(validate_language_code("").is_err());
}

#[test]
fn test_getLanguageName_withKnownCode_shouldReturnEnglishName() {
    assert_eq!(get_language_name("de").unwrap(), "German");
    assert_eq!(get_language_name("it").unwrap(), "Italian");
    assert!(get_language_name("zz").is_err());
}

#[test]
fn test_languageCodesMatch_withSameLanguage_shouldMatch() {
    assert!(language_codes_match("de", "DE"));
    assert!(language_codes_match("en", " en "));
    assert!(!language_codes_match("de", "it"));
    assert!(!language_codes_match("zz", "zz"));
}
