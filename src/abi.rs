//! Embedded contract ABI fragments.
//!
//! Each constant holds the JSON ABI for the functions the client actually
//! calls, trimmed from the full contract ABIs.

pub const REGISTRY: &str = include_str!("../abi/registry.json");
pub const MULTI_REGISTRY: &str = include_str!("../abi/multi_registry.json");
pub const REVERSE_MAPPING: &str = include_str!("../abi/reverse_mapping.json");
pub const SEND_TO_HASH: &str = include_str!("../abi/send_to_hash.json");
pub const TIPPING: &str = include_str!("../abi/tipping.json");
pub const PRICE_ORACLE: &str = include_str!("../abi/price_oracle.json");
pub const VOTING: &str = include_str!("../abi/voting.json");
pub const ERC20: &str = include_str!("../abi/erc20.json");
pub const ERC721: &str = include_str!("../abi/erc721.json");
pub const ERC1155: &str = include_str!("../abi/erc1155.json");
