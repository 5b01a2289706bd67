pub mod string;

pub use string::{last_segment, split_list, to_env_key};
