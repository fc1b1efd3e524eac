//! Loopso contract ABI definitions
//!
//! Uses alloy's sol! macro to generate type-safe bindings for the bridge
//! contract and the token standards it moves.

#![allow(clippy::too_many_arguments)]

use alloy::sol;

sol! {
    /// Attestation record stored by the bridge for every supported token
    struct TokenAttestation {
        address tokenAddress;
        uint256 tokenChain;
        uint8 tokenType;
        uint8 decimals;
        string symbol;
        string name;
        address wrappedTokenAddress;
    }

    /// Loopso bridge contract interface
    #[sol(rpc)]
    contract Loopso {
        // ========================================================================
        // Bridging
        // ========================================================================

        /// Lock ERC20 tokens and mint the wrapped representative on `_dstChain`
        function bridgeTokens(address _token, uint256 _amount, uint256 _dstChain, address _dstAddress) external;

        /// Burn wrapped ERC20 tokens and release the originals
        function bridgeTokensBack(uint256 _amount, address _to, bytes32 _attestationID) external;

        /// Lock an ERC721 token and mint the wrapped representative on `_dstChain`
        function bridgeNonFungibleTokens(address _token, uint256 _tokenID, string tokenURI, uint256 _dstChain, address _dstAddress) external;

        /// Burn a wrapped ERC721 token and release the original
        function bridgeNonFungibleTokensBack(uint256 _tokenId, address _to, bytes32 _attestationID) external;

        // ========================================================================
        // Token Registry
        // ========================================================================

        function isTokenSupported(address _tokenAddress, uint256 _tokenChain) external view returns (bool);

        function getAllSupportedTokens() external view returns (TokenAttestation[] memory);

        function getSupportedTokensLength() external view returns (uint256);

        /// Attestation of the original token for a wrapped token address (zeroed if unknown)
        function wrappedTokenInfo(address wrappedToken) external view returns (
            address tokenAddress,
            uint256 tokenChain,
            uint8 tokenType,
            uint8 decimals,
            string memory symbol,
            string memory name,
            address wrappedTokenAddress
        );

        // ========================================================================
        // Fees
        // ========================================================================

        /// Fungible fee in basis points
        function feeFungible() external view returns (uint256);

        /// Flat non-fungible fee in native units
        function feeNonFungible() external view returns (uint256);

        // ========================================================================
        // Events
        // ========================================================================

        event TokensBridged(bytes32 indexed transferID, uint8 indexed tokenType);
    }

    /// ERC20 token interface (subset)
    #[sol(rpc)]
    contract IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
    }

    /// ERC721 token interface (subset)
    #[sol(rpc)]
    contract IERC721 {
        function approve(address to, uint256 tokenId) external;
        function getApproved(uint256 tokenId) external view returns (address);
        function ownerOf(uint256 tokenId) external view returns (address);
        function tokenURI(uint256 tokenId) external view returns (string memory);
    }

    /// Wrapped native token (WETH9-style)
    #[sol(rpc)]
    contract IWrappedNative {
        function deposit() external payable;
        function withdraw(uint256 wad) external;
        function balanceOf(address account) external view returns (uint256);
    }
}
