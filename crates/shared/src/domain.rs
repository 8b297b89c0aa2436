//! Chain primitives used across the workspace.

pub use alloy_primitives::{
    address, hex,
    utils::{format_ether, parse_ether, UnitsError},
    Address, Bytes, TxHash, TxKind, U256,
};
