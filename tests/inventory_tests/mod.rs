pub mod pagination;
pub mod recorded;
pub mod test_utils;
