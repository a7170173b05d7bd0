pub mod extractor;
pub mod passcode;
pub mod test_utils;
