/// Diagnostic page sent by the test print: header line, confirmation line, trailing feed.
pub const TEST_PAGE_TEXT: &str = "***** Test Print *****\nPOS App Config OK\n\n\n\n";

/// UTF-8 bytes of [`TEST_PAGE_TEXT`].
pub fn test_page() -> Vec<u8> {
    TEST_PAGE_TEXT.as_bytes().to_vec()
}
