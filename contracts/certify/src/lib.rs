// Allow `cargo stylus export-abi` to generate a main function.
#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
#![cfg_attr(not(any(test, feature = "export-abi")), no_std)]

#[macro_use]
extern crate alloc;

use alloc::{string::String, vec::Vec};

use alloy_primitives::{aliases::U8, Address, B256, U256};
use certify_core::{
    interfaces::certify::ICertify,
    log_msg, registry,
    signature::{certificate_hash, split_signature, SignatureParts, SignerRecovery},
    store::{Certificate, Chairperson, EventSink, RegistryEvent, RegistryStore},
};
use stylus_sdk::{
    abi::Bytes,
    prelude::*,
    storage::{StorageAddress, StorageB256, StorageMap, StorageString, StorageU256, StorageU8},
    stylus_core,
};

#[cfg(test)]
pub mod test;

#[storage]
pub struct CertificateRecord {
    owner: StorageAddress,
    publisher: StorageAddress,
    uri: StorageString,
    r: StorageB256,
    s: StorageB256,
    v: StorageU8,
}

#[storage]
#[entrypoint]
pub struct Certify {
    chairperson: StorageAddress,
    chairperson_name: StorageString,
    token_counter: StorageU256,
    publishers: StorageMap<Address, StorageString>,
    certificates: StorageMap<U256, CertificateRecord>,
}

impl Certify {
    fn _attendee(&self) -> Address {
        self.vm().msg_sender()
    }

    fn _initialize(&mut self, chairperson: Address, name: String) -> Result<(), Vec<u8>> {
        registry::initialize(self, chairperson, name)?;
        Ok(())
    }
}

impl RegistryStore for Certify {
    fn load_chairperson(&self) -> Option<Chairperson> {
        let address = self.chairperson.get();
        if address.is_zero() {
            return None;
        }
        Some(Chairperson {
            address,
            name: self.chairperson_name.get_string(),
        })
    }

    fn store_chairperson(&mut self, chairperson: Chairperson) {
        self.chairperson.set(chairperson.address);
        self.chairperson_name.set_str(chairperson.name);
    }

    fn load_counter(&self) -> U256 {
        self.token_counter.get()
    }

    fn store_counter(&mut self, counter: U256) {
        self.token_counter.set(counter);
    }

    fn load_username(&self, publisher: Address) -> String {
        self.publishers.getter(publisher).get_string()
    }

    fn store_username(&mut self, publisher: Address, username: String) {
        // Empty username clears the entry
        self.publishers.setter(publisher).set_str(username);
    }

    fn load_certificate(&self, token_id: U256) -> Option<Certificate> {
        let record = self.certificates.getter(token_id);
        let owner = record.owner.get();
        // Recipient is never null, so null owner means not issued
        if owner.is_zero() {
            return None;
        }
        Some(Certificate {
            owner,
            uri: record.uri.get_string(),
            publisher: record.publisher.get(),
            signature: SignatureParts::new(record.r.get(), record.s.get(), record.v.get().to()),
        })
    }

    fn store_certificate(&mut self, token_id: U256, certificate: Certificate) {
        let mut record = self.certificates.setter(token_id);
        record.owner.set(certificate.owner);
        record.publisher.set(certificate.publisher);
        record.uri.set_str(certificate.uri);
        record.r.set(certificate.signature.r);
        record.s.set(certificate.signature.s);
        record.v.set(U8::from(certificate.signature.v));
    }
}

impl SignerRecovery for Certify {
    #[cfg(target_arch = "wasm32")]
    fn recover_signer(&self, digest: B256, parts: &SignatureParts) -> Option<Address> {
        use certify_core::signature::{ecrecover_input, ecrecover_output, ECRECOVER_ADDRESS};

        let input = ecrecover_input(digest, parts)?;
        let output = self
            .vm()
            .static_call(&self, ECRECOVER_ADDRESS, &input)
            .ok()?;
        ecrecover_output(&output)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn recover_signer(&self, digest: B256, parts: &SignatureParts) -> Option<Address> {
        certify_core::signature::EcdsaRecovery.recover_signer(digest, parts)
    }
}

impl EventSink for Certify {
    fn publish_event(&mut self, event: RegistryEvent) {
        match event {
            RegistryEvent::CertificatePublished {
                recipient,
                token_id,
            } => stylus_core::log(
                self.vm(),
                ICertify::CertificatePublished {
                    recipient,
                    tokenId: token_id,
                },
            ),
            RegistryEvent::PublisherGranted {
                publisher,
                username,
            } => stylus_core::log(
                self.vm(),
                ICertify::PublisherGranted {
                    publisher,
                    username,
                },
            ),
            RegistryEvent::PublisherRevoked { publisher } => {
                stylus_core::log(self.vm(), ICertify::PublisherRevoked { publisher })
            }
        }
    }
}

/// Certificate Registry
///
/// Chairperson is whoever deploys the contract, and only chairperson can grant
/// and revoke the right to publish. Publisher signs `keccak256(uri)` with
/// `personal_sign`, and anyone can submit that signature to mint certificate
/// for the recipient.
///
/// Certificate ids start from 1, and `getTokenCounter()` returns the id of the
/// next certificate, so issued ids are `1..getTokenCounter()`.
///
#[public]
impl Certify {
    #[constructor]
    pub fn constructor(&mut self, chairperson_name: String) -> Result<(), Vec<u8>> {
        // Contract is deployed via StylusDeployer, so msg_sender is not the deployer
        let deployer = self.vm().tx_origin();
        self._initialize(deployer, chairperson_name)
    }

    pub fn get_chairperson(&self) -> Result<(Address, String), Vec<u8>> {
        let chairperson = registry::chairperson(self)?;
        Ok((chairperson.address, chairperson.name))
    }

    pub fn give_right_to_publish(
        &mut self,
        publisher: Address,
        username: String,
    ) -> Result<(), Vec<u8>> {
        let caller = self._attendee();
        registry::give_right_to_publish(self, caller, publisher, username)?;
        Ok(())
    }

    pub fn revoke_publisher(&mut self, publisher: Address) -> Result<(), Vec<u8>> {
        let caller = self._attendee();
        registry::revoke_publisher(self, caller, publisher)?;
        Ok(())
    }

    pub fn get_publisher(&self, publisher: Address) -> Result<String, Vec<u8>> {
        let username = registry::get_publisher(self, publisher)?;
        Ok(username)
    }

    pub fn is_publisher(&self, publisher: Address) -> bool {
        registry::is_publisher(self, publisher)
    }

    /// Mint certificate for the recipient.
    ///
    /// Parameters
    /// ----------
    /// - recipient: An address receiving the certificate.
    /// - v, r, s: Signature components, as returned by `splitSignature()`.
    /// - certificate_uri: Certificate content, which publisher signed.
    ///
    /// Anyone can call this, as the publisher is recovered from the signature.
    ///
    pub fn publish_certificate_token(
        &mut self,
        recipient: Address,
        v: u8,
        r: B256,
        s: B256,
        certificate_uri: String,
    ) -> Result<U256, Vec<u8>> {
        let signature = SignatureParts::new(r, s, v);
        let token_id =
            registry::publish_certificate_token(self, recipient, signature, certificate_uri)?;
        log_msg!("Published certificate {}", token_id);
        Ok(token_id)
    }

    pub fn verify_certificate(
        &self,
        token_id: U256,
        certificate_hash: B256,
        signer: Address,
    ) -> Result<(bool, String), Vec<u8>> {
        let result = registry::verify_certificate(self, token_id, certificate_hash, signer)?;
        Ok(result)
    }

    pub fn split_signature(&self, signature: Bytes) -> Result<(B256, B256, u8), Vec<u8>> {
        let parts = split_signature(&signature)?;
        Ok((parts.r, parts.s, parts.v))
    }

    pub fn certificate_hash(&self, certificate_uri: String) -> B256 {
        certificate_hash(&certificate_uri)
    }

    pub fn get_token_counter(&self) -> U256 {
        registry::token_counter(self)
    }

    #[selector(name = "tokenURI")]
    pub fn token_uri(&self, token_id: U256) -> Result<String, Vec<u8>> {
        let uri = registry::token_uri(self, token_id)?;
        Ok(uri)
    }

    pub fn owner_of(&self, token_id: U256) -> Result<Address, Vec<u8>> {
        let owner = registry::owner_of(self, token_id)?;
        Ok(owner)
    }

    pub fn publisher_of(&self, token_id: U256) -> Result<Address, Vec<u8>> {
        let publisher = registry::publisher_of(self, token_id)?;
        Ok(publisher)
    }
}
