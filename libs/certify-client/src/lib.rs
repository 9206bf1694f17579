pub mod certify;
pub mod contracts;
pub mod tx_client;
