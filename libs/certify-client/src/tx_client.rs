use certify_core::log_msg;
use ethers::{
    abi::{Address, Detokenize},
    contract::{ContractCall, ContractError},
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{TransactionReceipt, U64},
};
use eyre::{eyre, Context, OptionExt};
use std::{str::FromStr, sync::Arc, time::Duration};

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Nitro dev node produces blocks on demand, so short interval is enough.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Stylus contracts revert with raw bytes rather than ABI encoded `Error(string)`.
pub fn revert_message(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

pub fn contract_error<M: Middleware>(err: ContractError<M>) -> eyre::Report {
    match err.as_revert() {
        Some(data) => eyre!("Reverted: {}", revert_message(data)),
        None => eyre!("Contract call failed: {}", err),
    }
}

#[derive(Clone)]
pub struct TxClient {
    client: Arc<SignerClient>,
    poll_interval: Duration,
}

impl TxClient {
    pub async fn try_new_from_url(
        rpc_url: &str,
        get_private_key: impl Fn() -> eyre::Result<String>,
    ) -> eyre::Result<Self> {
        let this = Self {
            client: {
                let provider = Provider::<Http>::try_from(rpc_url)?;
                let priv_key = get_private_key()?;
                let wallet = LocalWallet::from_str(&priv_key)
                    .context("Failed to parse private key")?;
                let chain_id = provider
                    .get_chainid()
                    .await
                    .context("Failed to fetch chain id")?
                    .as_u64();
                Arc::new(SignerMiddleware::new(
                    provider,
                    wallet.with_chain_id(chain_id),
                ))
            },
            poll_interval: DEFAULT_POLL_INTERVAL,
        };
        Ok(this)
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn client(&self) -> Arc<SignerClient> {
        self.client.clone()
    }

    /// Provider underneath the signer, for calls that need no wallet.
    pub fn provider(&self) -> Provider<Http> {
        self.client.inner().clone()
    }

    pub fn wallet(&self) -> &LocalWallet {
        self.client.signer()
    }

    pub fn address(&self) -> Address {
        self.client.address()
    }

    /// Send transaction and poll for its receipt until it is mined.
    pub async fn send<D>(&self, call: ContractCall<SignerClient, D>) -> eyre::Result<TransactionReceipt>
    where
        D: Detokenize,
    {
        let pending = call.send().await.map_err(contract_error)?;
        let tx_hash = *pending;
        log_msg!("awaiting receipt of {:?}...", tx_hash);

        let receipt = pending
            .interval(self.poll_interval)
            .await
            .context("Failed to obtain receipt")?
            .ok_or_eyre("Transaction dropped from mempool")?;

        if receipt.status != Some(U64::one()) {
            Err(eyre!("Transaction {:?} reverted", tx_hash))?;
        }

        log_msg!("Receipt: {:?}", receipt);
        Ok(receipt)
    }
}
