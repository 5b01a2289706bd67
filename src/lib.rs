/// Export Env
///
/// Resolves CloudFormation intrinsic references (`Ref`, `Fn::GetAtt`,
/// `Fn::ImportValue`, `Fn::Join`) found in a service's environment variables
/// against a snapshot of deployed stack inventory, producing plain values
/// suitable for a `.env` file.
pub mod cli;
pub mod collect;
pub mod engine;
pub mod error;
pub mod expression;
pub mod inventory;
pub mod logging;
pub mod output;
pub mod overrides;
pub mod utils;

pub use engine::{Diagnostic, Resolution, ResolvedValue, Resolver};
pub use expression::Expression;
pub use inventory::InventorySnapshot;
pub use overrides::OverrideMaps;
