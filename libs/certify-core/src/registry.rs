//! Certificate Registry
//! ---
//!
//! Chairperson grants and revokes the right to publish. Publishers sign
//! certificate content off-chain, and anyone can submit signed certificate to
//! be minted for the recipient, paying for the transaction on behalf of the
//! publisher. Anyone can then verify that certificate was signed by a given
//! publisher.
//!
//! Every function here takes the storage (and host capabilities) explicitly,
//! and write functions take the caller explicitly. Write functions complete
//! all validation before first store, so that failure leaves state untouched.
//!
use alloc::string::String;

use alloy_primitives::{uint, Address, B256, U256};

use crate::{
    error::{CertifyError, CertifyResult},
    log_msg,
    signature::{certificate_hash, signed_message_hash, SignatureParts, SignerRecovery},
    store::{Certificate, Chairperson, EventSink, RegistryEvent, RegistryStore},
};

/// Counter starts here, and always holds the id of the next certificate.
///
/// Issued certificates are therefore `FIRST_TOKEN_ID..counter`.
pub const FIRST_TOKEN_ID: U256 = uint!(1_U256);

fn only_chairperson<H>(host: &H, caller: Address) -> CertifyResult<()>
where
    H: RegistryStore,
{
    match host.load_chairperson() {
        Some(chairperson) if chairperson.address == caller => Ok(()),
        _ => Err(CertifyError::Unauthorized),
    }
}

fn load_issued<H>(host: &H, token_id: U256) -> CertifyResult<Certificate>
where
    H: RegistryStore,
{
    host.load_certificate(token_id)
        .ok_or(CertifyError::UnknownCertificate)
}

pub fn initialize<H>(host: &mut H, chairperson: Address, name: String) -> CertifyResult<()>
where
    H: RegistryStore,
{
    if host.load_chairperson().is_some() {
        return Err(CertifyError::AlreadyInitialized);
    }
    if chairperson.is_zero() {
        return Err(CertifyError::InvalidAddress);
    }
    log_msg!("Chairperson {} ({})", chairperson, name);
    host.store_chairperson(Chairperson {
        address: chairperson,
        name,
    });
    host.store_counter(FIRST_TOKEN_ID);
    Ok(())
}

pub fn chairperson<H>(host: &H) -> CertifyResult<Chairperson>
where
    H: RegistryStore,
{
    host.load_chairperson().ok_or(CertifyError::NotInitialized)
}

/// Grant (or re-grant with new username) the right to publish.
pub fn give_right_to_publish<H>(
    host: &mut H,
    caller: Address,
    publisher: Address,
    username: String,
) -> CertifyResult<()>
where
    H: RegistryStore + EventSink,
{
    only_chairperson(host, caller)?;
    if publisher.is_zero() {
        return Err(CertifyError::InvalidAddress);
    }
    if username.is_empty() {
        return Err(CertifyError::EmptyUsername);
    }
    log_msg!("Grant {} as {}", publisher, username);
    host.store_username(publisher, username.clone());
    host.publish_event(RegistryEvent::PublisherGranted {
        publisher,
        username,
    });
    Ok(())
}

/// Revoking address that isn't a publisher is a no-op.
pub fn revoke_publisher<H>(host: &mut H, caller: Address, publisher: Address) -> CertifyResult<()>
where
    H: RegistryStore + EventSink,
{
    only_chairperson(host, caller)?;
    if host.load_username(publisher).is_empty() {
        return Ok(());
    }
    log_msg!("Revoke {}", publisher);
    host.store_username(publisher, String::new());
    host.publish_event(RegistryEvent::PublisherRevoked { publisher });
    Ok(())
}

pub fn get_publisher<H>(host: &H, publisher: Address) -> CertifyResult<String>
where
    H: RegistryStore,
{
    let username = host.load_username(publisher);
    if username.is_empty() {
        return Err(CertifyError::NotAPublisher);
    }
    Ok(username)
}

pub fn is_publisher<H>(host: &H, publisher: Address) -> bool
where
    H: RegistryStore,
{
    !publisher.is_zero() && !host.load_username(publisher).is_empty()
}

/// Mint new certificate for the recipient.
///
/// Signer is recovered from the signature over `certificate_uri`, and must be
/// an active publisher. Caller is irrelevant, so that anyone can sponsor the
/// transaction.
pub fn publish_certificate_token<H>(
    host: &mut H,
    recipient: Address,
    signature: SignatureParts,
    certificate_uri: String,
) -> CertifyResult<U256>
where
    H: RegistryStore + SignerRecovery + EventSink,
{
    if recipient.is_zero() {
        return Err(CertifyError::InvalidAddress);
    }

    let digest = signed_message_hash(certificate_hash(&certificate_uri));
    let publisher = host
        .recover_signer(digest, &signature)
        .ok_or(CertifyError::UnauthorizedPublisher)?;

    if !is_publisher(host, publisher) {
        log_msg!("Signer {} is not a publisher", publisher);
        return Err(CertifyError::UnauthorizedPublisher);
    }

    let token_id = host.load_counter();
    let next_token_id = token_id + uint!(1_U256);

    log_msg!("Publish {} for {} by {}", token_id, recipient, publisher);
    host.store_certificate(
        token_id,
        Certificate {
            owner: recipient,
            uri: certificate_uri,
            publisher,
            signature,
        },
    );
    host.store_counter(next_token_id);
    host.publish_event(RegistryEvent::CertificatePublished {
        recipient,
        token_id,
    });
    Ok(token_id)
}

/// Check that certificate was signed by `claimed_signer` over `certificate_hash`.
///
/// Signer is recovered from signature stored at issuance, and it must match
/// claimed signer, the issuing publisher, and still be an active publisher.
/// Returns username of the publisher when valid, and empty string otherwise.
pub fn verify_certificate<H>(
    host: &H,
    token_id: U256,
    certificate_hash: B256,
    claimed_signer: Address,
) -> CertifyResult<(bool, String)>
where
    H: RegistryStore + SignerRecovery,
{
    let certificate = load_issued(host, token_id)?;

    let digest = signed_message_hash(certificate_hash);
    let Some(signer) = host.recover_signer(digest, &certificate.signature) else {
        return Ok((false, String::new()));
    };

    if signer != claimed_signer || signer != certificate.publisher {
        return Ok((false, String::new()));
    }

    let username = host.load_username(signer);
    Ok((!username.is_empty(), username))
}

pub fn token_counter<H>(host: &H) -> U256
where
    H: RegistryStore,
{
    host.load_counter()
}

pub fn token_uri<H>(host: &H, token_id: U256) -> CertifyResult<String>
where
    H: RegistryStore,
{
    Ok(load_issued(host, token_id)?.uri)
}

pub fn owner_of<H>(host: &H, token_id: U256) -> CertifyResult<Address>
where
    H: RegistryStore,
{
    Ok(load_issued(host, token_id)?.owner)
}

pub fn publisher_of<H>(host: &H, token_id: U256) -> CertifyResult<Address>
where
    H: RegistryStore,
{
    Ok(load_issued(host, token_id)?.publisher)
}
