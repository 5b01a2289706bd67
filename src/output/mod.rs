mod formatter;

pub use formatter::{JsonOutput, OutputFormatter, DOTENV_LINE_SEPARATOR};
