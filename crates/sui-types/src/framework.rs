//! Framework addresses and the native coin type.
//!
//! These are process-wide constants; nothing here is mutable at runtime.
//!
//! ```
//! use sui_ptb_types::framework::{coin_object_type, SUI_COIN_TYPE};
//!
//! let coin = coin_object_type(SUI_COIN_TYPE);
//! assert!(coin.ends_with(&format!("::coin::Coin<{}>", SUI_COIN_TYPE)));
//! ```

use crate::encoding::{format_address, parse_type_tag};
use move_core_types::account_address::AccountAddress;
use move_core_types::language_storage::TypeTag;

/// Sui framework address (0x2)
pub const SUI_FRAMEWORK: AccountAddress = {
    let mut bytes = [0u8; 32];
    bytes[31] = 2;
    AccountAddress::new(bytes)
};

/// Fully qualified type of the native SUI coin.
pub const SUI_COIN_TYPE: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI";

const COIN_MODULE: &str = "coin";
const COIN_STRUCT: &str = "Coin";

/// Object type wrapping a balance of `coin_type`: `0x2::coin::Coin<coin_type>`.
pub fn coin_object_type(coin_type: &str) -> String {
    format!(
        "{}::{}::{}<{}>",
        format_address(&SUI_FRAMEWORK),
        COIN_MODULE,
        COIN_STRUCT,
        coin_type
    )
}

/// Whether `object_type` is `0x2::coin::Coin<coin_type>`.
///
/// Both sides are parsed, so short and long address forms compare equal.
pub fn is_coin_of(object_type: &str, coin_type: &str) -> bool {
    let (Ok(object_tag), Ok(coin_tag)) = (parse_type_tag(object_type), parse_type_tag(coin_type))
    else {
        return false;
    };
    match object_tag {
        TypeTag::Struct(tag) => {
            tag.address == SUI_FRAMEWORK
                && tag.module.as_str() == COIN_MODULE
                && tag.name.as_str() == COIN_STRUCT
                && tag.type_params == [coin_tag]
        }
        _ => false,
    }
}
