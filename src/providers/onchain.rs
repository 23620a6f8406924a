//! Collaborators backed by Uniswap-V2-style contracts over JSON-RPC.
//!
//! All three readers share one [`RpcCaller`], a thin wrapper around an HTTP
//! `RootProvider` that issues read-only `eth_call`s and maps transport and ABI
//! failures into [`ProviderError`]s naming the contract method that failed.

use super::{DecimalsReader, PairResolver, Reserves, ReserveReader};
use crate::errors::{ProviderError, Result, UtilityError};
use crate::graph::PoolId;
use alloy::{
    network::Ethereum,
    primitives::{Address, Bytes, TxKind},
    providers::{Provider, RootProvider},
    rpc::types::{TransactionInput, TransactionRequest},
    sol_types::SolCall,
};
use async_trait::async_trait;
use num_bigint::BigUint;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

mod uniswap_v2 {
    alloy::sol! {
        interface IUniswapV2Factory {
            function getPair(address tokenA, address tokenB) external view returns (address pair);
        }

        interface IUniswapV2Pair {
            function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
        }
    }
}

mod erc20 {
    alloy::sol! {
        interface IERC20Metadata {
            function decimals() external view returns (uint8);
        }
    }
}

use erc20::IERC20Metadata;
use uniswap_v2::{IUniswapV2Factory, IUniswapV2Pair};

/// Shared read-only access to an EVM JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcCaller {
    provider: Arc<RootProvider<Ethereum>>,
}

impl RpcCaller {
    /// Connect to the HTTP endpoint at `rpc_url`.
    pub fn connect(rpc_url: &str) -> Result<Self> {
        let url = rpc_url.parse::<url::Url>().map_err(|e| UtilityError::InvalidConfiguration {
            message: format!("Invalid RPC URL '{}': {}", rpc_url, e),
        })?;
        Ok(Self::new(Arc::new(RootProvider::new_http(url))))
    }

    /// Wrap an existing provider.
    pub fn new(provider: Arc<RootProvider<Ethereum>>) -> Self {
        Self { provider }
    }

    /// Execute `call` against `target` and decode its return value.
    pub async fn call<C: SolCall>(&self, target: Address, call: C) -> Result<C::Return> {
        let tx = TransactionRequest {
            to: Some(TxKind::Call(target)),
            input: TransactionInput {
                input: Some(Bytes::from(call.abi_encode())),
                data: None,
            },
            ..Default::default()
        };

        let output = self.provider.call(tx).await.map_err(|e| ProviderError::Rpc {
            method: C::SIGNATURE,
            target,
            message: e.to_string(),
        })?;

        C::abi_decode_returns(&output).map_err(|e| {
            ProviderError::Decode {
                method: C::SIGNATURE,
                target,
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// Resolves pairs through a factory's `getPair`.
#[derive(Debug, Clone)]
pub struct OnChainPairResolver {
    rpc: RpcCaller,
    factory: Address,
}

impl OnChainPairResolver {
    pub fn new(rpc: RpcCaller, factory: Address) -> Self {
        Self { rpc, factory }
    }
}

#[async_trait]
impl PairResolver for OnChainPairResolver {
    async fn resolve_pool(&self, asset_a: Address, asset_b: Address) -> Result<PoolId> {
        let call = IUniswapV2Factory::getPairCall {
            tokenA: asset_a,
            tokenB: asset_b,
        };
        let pair = self.rpc.call(self.factory, call).await?;

        // The factory answers the zero address for pairs it never created
        if pair == Address::ZERO {
            tracing::trace!(%asset_a, %asset_b, "Factory has no pair");
            return Err(ProviderError::PairNotFound { asset_a, asset_b }.into());
        }
        Ok(pair)
    }
}

/// Reads reserves through a pair contract's `getReserves`.
#[derive(Debug, Clone)]
pub struct OnChainReserveReader {
    rpc: RpcCaller,
}

impl OnChainReserveReader {
    pub fn new(rpc: RpcCaller) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl ReserveReader for OnChainReserveReader {
    async fn read_reserves(&self, pool: PoolId) -> Result<Reserves> {
        let reserves = self.rpc.call(pool, IUniswapV2Pair::getReservesCall {}).await?;
        Ok(Reserves::new(
            BigUint::from_bytes_be(&reserves.reserve0.to_be_bytes_vec()),
            BigUint::from_bytes_be(&reserves.reserve1.to_be_bytes_vec()),
        ))
    }
}

/// Reads ERC-20 `decimals`, remembering every answer.
///
/// An asset's precision never changes, so each asset is queried at most once per
/// reader (modulo concurrent first reads).
#[derive(Debug)]
pub struct OnChainDecimalsReader {
    rpc: RpcCaller,
    known: RwLock<HashMap<Address, u8>>,
}

impl OnChainDecimalsReader {
    pub fn new(rpc: RpcCaller) -> Self {
        Self {
            rpc,
            known: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl DecimalsReader for OnChainDecimalsReader {
    async fn read_decimals(&self, asset: Address) -> Result<u8> {
        if let Some(decimals) = self.known.read().await.get(&asset) {
            return Ok(*decimals);
        }

        let decimals = self.rpc.call(asset, IERC20Metadata::decimalsCall {}).await?;
        self.known.write().await.insert(asset, decimals);
        Ok(decimals)
    }
}
