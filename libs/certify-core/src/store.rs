use alloc::string::String;

use alloy_primitives::{Address, U256};

use crate::signature::SignatureParts;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chairperson {
    pub address: Address,
    pub name: String,
}

/// Certificate record as written once at issuance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Certificate {
    pub owner: Address,
    pub uri: String,
    /// Publisher recovered from the signature at issuance
    pub publisher: Address,
    pub signature: SignatureParts,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    CertificatePublished { recipient: Address, token_id: U256 },
    PublisherGranted { publisher: Address, username: String },
    PublisherRevoked { publisher: Address },
}

/// Persistent state of the registry.
///
/// Contract implements this on top of its storage, while tests use plain maps.
/// Empty username means that address is not a publisher.
pub trait RegistryStore {
    fn load_chairperson(&self) -> Option<Chairperson>;

    fn store_chairperson(&mut self, chairperson: Chairperson);

    fn load_counter(&self) -> U256;

    fn store_counter(&mut self, counter: U256);

    fn load_username(&self, publisher: Address) -> String;

    fn store_username(&mut self, publisher: Address, username: String);

    fn load_certificate(&self, token_id: U256) -> Option<Certificate>;

    fn store_certificate(&mut self, token_id: U256, certificate: Certificate);
}

pub trait EventSink {
    fn publish_event(&mut self, event: RegistryEvent);
}
