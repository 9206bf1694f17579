use alloy_primitives::{uint, B256, U256};
use alloy_sol_types::SolEvent;
use certify_core::{interfaces::certify::ICertify, signature::certificate_hash};

mod test_utils {
    use alloy_primitives::{Address, B256, U256};
    use alloy_sol_types::SolEvent;
    use certify_core::signature::{certificate_hash, signed_message_hash};
    use k256::ecdsa::SigningKey;
    use stylus_sdk::testing::*;

    use crate::Certify;

    pub(super) struct TestWallet {
        key: SigningKey,
    }

    impl TestWallet {
        pub(super) fn new(seed: u8) -> Self {
            Self {
                key: SigningKey::from_slice(&[seed; 32]).unwrap(),
            }
        }

        pub(super) fn address(&self) -> Address {
            Address::from_private_key(&self.key)
        }

        /// 65 bytes `r || s || v` as returned by `personal_sign`
        pub(super) fn personal_sign(&self, certificate_uri: &str) -> Vec<u8> {
            let digest = signed_message_hash(certificate_hash(certificate_uri));
            let (signature, recovery_id) =
                self.key.sign_prehash_recoverable(digest.as_slice()).unwrap();
            let mut bytes = signature.to_bytes().to_vec();
            bytes.push(27 + recovery_id.to_byte());
            bytes
        }
    }

    pub(super) const DEPLOYER: Address = Address::repeat_byte(0xde);

    pub(super) struct TestSetup {
        pub(super) vm: TestVM,
        pub(super) contract: Certify,
        pub(super) chairperson: Address,
        pub(super) publisher: TestWallet,
        pub(super) user: TestWallet,
    }

    impl TestSetup {
        pub(super) fn new() -> Self {
            let vm = TestVM::default();
            let mut contract = Certify::from(&vm);
            let chairperson = Address::repeat_byte(0xc1);
            // Deployment goes through a deployer contract, which is msg.sender
            vm.set_tx_origin(chairperson);
            vm.set_sender(DEPLOYER);
            contract
                .constructor("ChairpersonUsername".into())
                .unwrap();
            Self {
                vm,
                contract,
                chairperson,
                publisher: TestWallet::new(2),
                user: TestWallet::new(3),
            }
        }

        pub(super) fn with_publisher(username: &str) -> Self {
            let mut setup = Self::new();
            setup.vm.set_sender(setup.chairperson);
            setup
                .contract
                .give_right_to_publish(setup.publisher.address(), username.into())
                .unwrap();
            setup
        }

        /// Sign with publisher, split on-chain, and submit as the user.
        pub(super) fn publish(&mut self, certificate_uri: &str) -> Result<U256, Vec<u8>> {
            let signature = self.publisher.personal_sign(certificate_uri);
            let (r, s, v) = self.contract.split_signature(signature.into()).unwrap();
            self.vm.set_sender(self.user.address());
            let recipient = self.user.address();
            self.contract
                .publish_certificate_token(recipient, v, r, s, certificate_uri.into())
        }

        pub(super) fn published_events(&self) -> Vec<(Vec<B256>, Vec<u8>)> {
            self.vm
                .get_emitted_logs()
                .into_iter()
                .filter(|(topics, _)| {
                    topics.first() == Some(&super::ICertify::CertificatePublished::SIGNATURE_HASH)
                })
                .collect()
        }
    }
}

mod unit_tests {
    use super::*;

    #[test]
    fn test_chairperson_is_set() {
        let setup = test_utils::TestSetup::new();

        let (address, name) = setup.contract.get_chairperson().unwrap();
        assert_eq!(address, setup.chairperson);
        assert_eq!(name, "ChairpersonUsername");
        assert_eq!(setup.contract.get_token_counter(), uint!(1_U256));
        assert_ne!(address, test_utils::DEPLOYER);
    }

    #[test]
    fn test_constructor_runs_once() {
        let mut setup = test_utils::TestSetup::new();

        setup.vm.set_tx_origin(setup.user.address());
        setup.vm.set_sender(setup.user.address());
        let err = setup
            .contract
            .constructor("Impostor".into())
            .unwrap_err();
        assert_eq!(err, b"Already initialized".to_vec());

        let (address, name) = setup.contract.get_chairperson().unwrap();
        assert_eq!(address, setup.chairperson);
        assert_eq!(name, "ChairpersonUsername");
    }

    #[test]
    fn test_chairperson_can_add_publisher() {
        let mut setup = test_utils::TestSetup::new();
        let publisher = setup.publisher.address();

        setup.vm.set_sender(setup.chairperson);
        setup
            .contract
            .give_right_to_publish(publisher, "Publisher1".into())
            .unwrap();

        assert_eq!(
            setup.contract.get_publisher(publisher).unwrap(),
            "Publisher1"
        );
        assert!(setup.contract.is_publisher(publisher));
    }

    #[test]
    fn test_non_chairperson_cannot_add_publisher() {
        let mut setup = test_utils::TestSetup::new();
        let publisher = setup.publisher.address();
        let user = setup.user.address();

        setup.vm.set_sender(publisher);
        assert_eq!(
            setup.contract.give_right_to_publish(user, "Publisher2".into()),
            Err(b"Only chairperson can call this function.".to_vec())
        );
    }

    #[test]
    fn test_chairperson_can_revoke_publisher() {
        let mut setup = test_utils::TestSetup::with_publisher("Publisher1");
        let publisher = setup.publisher.address();

        setup.contract.revoke_publisher(publisher).unwrap();

        assert_eq!(
            setup.contract.get_publisher(publisher),
            Err(b"Publisher is not valid!".to_vec())
        );
        assert!(!setup.contract.is_publisher(publisher));
    }

    #[test]
    fn test_non_chairperson_cannot_revoke_publisher() {
        let mut setup = test_utils::TestSetup::with_publisher("Publisher1");
        let publisher = setup.publisher.address();

        setup.vm.set_sender(publisher);
        assert_eq!(
            setup.contract.revoke_publisher(publisher),
            Err(b"Only chairperson can call this function.".to_vec())
        );
        assert!(setup.contract.is_publisher(publisher));
    }

    #[test]
    fn test_split_signature_rejects_wrong_length() {
        let setup = test_utils::TestSetup::new();

        assert_eq!(
            setup.contract.split_signature(vec![0u8; 64].into()),
            Err(b"Invalid signature length".to_vec())
        );
    }

    #[test]
    fn test_certificate_hash() {
        let setup = test_utils::TestSetup::new();
        let uri = "https://example.com/certificate";

        assert_eq!(
            setup.contract.certificate_hash(uri.into()),
            certificate_hash(uri)
        );
    }

    #[test]
    fn test_unknown_certificate() {
        let setup = test_utils::TestSetup::with_publisher("Publisher1");
        let token_id = uint!(1_U256);
        let not_found = b"Certificate does not exist".to_vec();

        assert_eq!(setup.contract.token_uri(token_id), Err(not_found.clone()));
        assert_eq!(setup.contract.owner_of(token_id), Err(not_found.clone()));
        assert_eq!(setup.contract.publisher_of(token_id), Err(not_found.clone()));
        assert_eq!(
            setup
                .contract
                .verify_certificate(token_id, B256::ZERO, setup.publisher.address()),
            Err(not_found)
        );
    }
}

mod test_scenarios {
    use super::*;

    #[test]
    fn test_publisher_can_publish_certificate() {
        let mut setup = test_utils::TestSetup::with_publisher("Publisher1");
        let uri = "https://example.com/certificate";

        let token_id = setup.publish(uri).unwrap();

        assert_eq!(token_id, uint!(1_U256));
        assert_eq!(setup.contract.get_token_counter(), uint!(2_U256));
        assert_eq!(setup.contract.token_uri(token_id).unwrap(), uri);
        assert_eq!(
            setup.contract.owner_of(token_id).unwrap(),
            setup.user.address()
        );

        let events = setup.published_events();
        assert_eq!(events.len(), 1);

        let (topics, data) = &events[0];
        let event = ICertify::CertificatePublished::decode_raw_log(
            topics.iter().copied(),
            data,
            true,
        )
        .unwrap();
        assert_eq!(event.recipient, setup.user.address());
        assert_eq!(event.tokenId, token_id);
    }

    #[test]
    fn test_unauthorized_publisher_is_rejected() {
        let mut setup = test_utils::TestSetup::new();

        assert_eq!(
            setup.publish("https://example.com/certificate"),
            Err(b"Only valid publisher can call this function.".to_vec())
        );
        assert_eq!(setup.contract.get_token_counter(), uint!(1_U256));
        assert!(setup.published_events().is_empty());
    }

    #[test]
    fn test_verify_valid_certificate() {
        let mut setup = test_utils::TestSetup::with_publisher("Publisher1");
        let uri = "https://example.com/certificate";
        let token_id = setup.publish(uri).unwrap();

        let result = setup
            .contract
            .verify_certificate(token_id, certificate_hash(uri), setup.publisher.address())
            .unwrap();

        assert_eq!(result, (true, "Publisher1".into()));
    }

    #[test]
    fn test_verify_with_invalid_signer() {
        let mut setup = test_utils::TestSetup::with_publisher("Publisher1");
        let uri = "https://example.com/certificate";
        let token_id = setup.publish(uri).unwrap();

        let (is_valid, _) = setup
            .contract
            .verify_certificate(token_id, certificate_hash(uri), setup.user.address())
            .unwrap();

        assert!(!is_valid);
    }

    #[test]
    fn test_revoke_lands_before_pending_publish() {
        let mut setup = test_utils::TestSetup::with_publisher("Publisher1");
        let publisher = setup.publisher.address();
        let first: U256 = setup.publish("u1").unwrap();

        setup.vm.set_sender(setup.chairperson);
        setup.contract.revoke_publisher(publisher).unwrap();

        assert_eq!(
            setup.publish("u2"),
            Err(b"Only valid publisher can call this function.".to_vec())
        );
        assert_eq!(setup.contract.get_token_counter(), first + uint!(1_U256));
        assert_eq!(setup.published_events().len(), 1);
    }
}
