//! Solidity call bindings for the token and vault contracts.

use alloy::sol;

sol! {
    /// ERC-20 surface of the lockable token. Only the calls the engine
    /// issues are declared.
    #[sol(rpc)]
    contract WildToken {
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// Time-lock vault contract.
    #[sol(rpc)]
    contract LockVault {
        function vaultCount(address owner) external view returns (uint256);
        function getUserVaults(address owner) external view returns (uint256[] memory);
        function getVault(address owner, uint256 vaultId)
            external
            view
            returns (uint256 amount, uint256 unlockTime, bool withdrawn, bool isUnlocked);
        function createVault(uint256 amount, uint256 unlockTime) external;
        function withdraw(uint256 vaultId) external;
    }
}
