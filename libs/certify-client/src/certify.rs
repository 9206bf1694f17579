//! Typed access to deployed Certify contract
//! ---
//!
//! Replaces dashboard forms: publisher management, signing and publishing
//! certificates, verification, and listing of all certificates.
//!
use certify_core::{
    log_msg,
    registry::FIRST_TOKEN_ID,
    signature::{certificate_hash, split_signature, SignatureParts},
};
use std::{future::Future, sync::Arc};

use ethers::{
    abi::Address,
    contract::parse_log,
    providers::{Http, Provider},
    signers::{LocalWallet, Signer},
    types::{TransactionReceipt, U256},
};
use eyre::{Context, OptionExt};
use futures::{stream, StreamExt, TryStreamExt};

use crate::{
    contracts::{Certify, CertificatePublishedFilter},
    tx_client::{contract_error, SignerClient, TxClient},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CertificateInfo {
    pub token_id: U256,
    pub owner: Address,
    pub uri: String,
}

/// Sign certificate content the way wallets do with `personal_sign`.
pub async fn sign_certificate(wallet: &LocalWallet, certificate_uri: &str) -> eyre::Result<SignatureParts> {
    let hash = certificate_hash(certificate_uri);
    let signature = wallet
        .sign_message(hash.as_slice())
        .await
        .context("Failed to sign certificate")?;
    let parts = split_signature(&signature.to_vec())?;
    Ok(parts)
}

/// Upper bound on view calls in flight while listing certificates.
pub const MAX_CONCURRENT_CALLS: usize = 8;

/// Find id of the certificate minted by transaction with given receipt.
///
/// Only logs emitted by the registry at `certify_address` are considered.
pub fn published_token_id(receipt: TransactionReceipt, certify_address: Address) -> eyre::Result<U256> {
    receipt
        .logs
        .into_iter()
        .filter(|log| log.address == certify_address)
        .find_map(|log| parse_log::<CertificatePublishedFilter>(log).ok())
        .map(|event| event.token_id)
        .ok_or_eyre("CertificatePublished event not found")
}

/// Fetch every id in order, with at most [`MAX_CONCURRENT_CALLS`] requests pending.
pub async fn fetch_buffered<T, F, Fut>(
    token_ids: impl IntoIterator<Item = U256>,
    fetch: F,
) -> eyre::Result<Vec<T>>
where
    F: FnMut(U256) -> Fut,
    Fut: Future<Output = eyre::Result<T>>,
{
    stream::iter(token_ids)
        .map(fetch)
        .buffered(MAX_CONCURRENT_CALLS)
        .try_collect()
        .await
}

struct Writer {
    tx_client: TxClient,
    contract: Certify<SignerClient>,
}

/// Views go through plain provider, and only transactions need the wallet.
pub struct CertifyClient {
    contract: Certify<Provider<Http>>,
    writer: Option<Writer>,
}

impl CertifyClient {
    pub fn new(tx_client: TxClient, certify_address: Address) -> Self {
        let contract = Certify::new(certify_address, Arc::new(tx_client.provider()));
        let writer = Writer {
            contract: Certify::new(certify_address, tx_client.client()),
            tx_client,
        };
        Self {
            contract,
            writer: Some(writer),
        }
    }

    /// Client for verification and lookups, without any private key.
    pub fn read_only(provider: Provider<Http>, certify_address: Address) -> Self {
        Self {
            contract: Certify::new(certify_address, Arc::new(provider)),
            writer: None,
        }
    }

    pub fn try_read_only_from_url(rpc_url: &str, certify_address: Address) -> eyre::Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url).context("Invalid RPC URL")?;
        Ok(Self::read_only(provider, certify_address))
    }

    /// Address of the signing wallet, if there is one.
    pub fn address(&self) -> Option<Address> {
        self.writer.as_ref().map(|writer| writer.tx_client.address())
    }

    pub fn certify_address(&self) -> Address {
        self.contract.address()
    }

    fn writer(&self) -> eyre::Result<&Writer> {
        self.writer
            .as_ref()
            .ok_or_eyre("Transaction requires a signer, but client is read-only")
    }

    pub async fn chairperson(&self) -> eyre::Result<(Address, String)> {
        let result = self
            .contract
            .get_chairperson()
            .call()
            .await
            .map_err(contract_error)?;
        Ok(result)
    }

    pub async fn give_right_to_publish(
        &self,
        publisher: Address,
        username: String,
    ) -> eyre::Result<TransactionReceipt> {
        log_msg!("Granting {:?} as {}...", publisher, username);
        let writer = self.writer()?;
        writer
            .tx_client
            .send(writer.contract.give_right_to_publish(publisher, username))
            .await
    }

    pub async fn revoke_publisher(&self, publisher: Address) -> eyre::Result<TransactionReceipt> {
        log_msg!("Revoking {:?}...", publisher);
        let writer = self.writer()?;
        writer
            .tx_client
            .send(writer.contract.revoke_publisher(publisher))
            .await
    }

    pub async fn get_publisher(&self, publisher: Address) -> eyre::Result<String> {
        let username = self
            .contract
            .get_publisher(publisher)
            .call()
            .await
            .map_err(contract_error)?;
        Ok(username)
    }

    /// Sign certificate with own wallet and submit it for the recipient.
    ///
    /// Returns id of the new certificate, as announced by `CertificatePublished` event.
    pub async fn publish_certificate(
        &self,
        recipient: Address,
        certificate_uri: String,
    ) -> eyre::Result<U256> {
        let parts = sign_certificate(self.writer()?.tx_client.wallet(), &certificate_uri).await?;
        log_msg!("Publishing certificate: r={} s={} v={}", parts.r, parts.s, parts.v);
        self.publish_signed_certificate(recipient, parts, certificate_uri)
            .await
    }

    /// Submit certificate signed by some publisher, paying for the transaction.
    pub async fn publish_signed_certificate(
        &self,
        recipient: Address,
        parts: SignatureParts,
        certificate_uri: String,
    ) -> eyre::Result<U256> {
        let writer = self.writer()?;
        let call = writer.contract.publish_certificate_token(
            recipient,
            parts.v,
            parts.r.0,
            parts.s.0,
            certificate_uri,
        );
        let receipt = writer.tx_client.send(call).await?;
        published_token_id(receipt, self.certify_address())
    }

    pub async fn verify_certificate(
        &self,
        token_id: U256,
        certificate_uri: &str,
        signer: Address,
    ) -> eyre::Result<(bool, String)> {
        let hash = certificate_hash(certificate_uri);
        let result = self
            .contract
            .verify_certificate(token_id, hash.0, signer)
            .call()
            .await
            .map_err(contract_error)?;
        Ok(result)
    }

    pub async fn token_counter(&self) -> eyre::Result<U256> {
        let counter = self
            .contract
            .get_token_counter()
            .call()
            .await
            .map_err(contract_error)?;
        Ok(counter)
    }

    pub async fn certificate(&self, token_id: U256) -> eyre::Result<CertificateInfo> {
        let uri = self
            .contract
            .token_uri(token_id)
            .call()
            .await
            .map_err(contract_error)?;
        let owner = self
            .contract
            .owner_of(token_id)
            .call()
            .await
            .map_err(contract_error)?;
        Ok(CertificateInfo {
            token_id,
            owner,
            uri,
        })
    }

    /// All issued certificates, i.e. ids from the first one up to the counter.
    pub async fn list_certificates(&self) -> eyre::Result<Vec<CertificateInfo>> {
        let counter = self.token_counter().await?;
        let first = U256::from(FIRST_TOKEN_ID.to::<u64>());
        if counter <= first {
            return Ok(Vec::new());
        }
        let count = (counter - first).as_usize();
        log_msg!("Listing {} certificates...", count);
        fetch_buffered((0..count).map(|offset| first + offset), |token_id| {
            self.certificate(token_id)
        })
        .await
    }
}
