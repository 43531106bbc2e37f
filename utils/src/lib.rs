pub mod completion_stub;
pub mod test_utils;
