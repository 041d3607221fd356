//! One module per subcommand, each exposing `run` (or one fn per action)

pub mod balance;
pub mod claim;
pub mod create;
pub mod escrow;
pub mod fund;
pub mod info;
pub mod inspect;
pub mod vault;
