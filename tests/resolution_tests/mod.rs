pub mod imports;
pub mod references;
pub mod scopes;
