use std::fmt::Write;

use certify_client::certify::{CertificateInfo, CertifyClient};
use ethers::types::U256;

use crate::Command;

pub async fn run_command(certify: &CertifyClient, command: Command) -> eyre::Result<String> {
    let output = match command {
        Command::Grant {
            publisher,
            username,
        } => {
            let receipt = certify.give_right_to_publish(publisher, username).await?;
            format!("Granted in {:?}", receipt.transaction_hash)
        }
        Command::Revoke { publisher } => {
            let receipt = certify.revoke_publisher(publisher).await?;
            format!("Revoked in {:?}", receipt.transaction_hash)
        }
        Command::Publisher { publisher } => certify.get_publisher(publisher).await?,
        Command::Chairperson => {
            let (address, name) = certify.chairperson().await?;
            format!("{} ({:?})", name, address)
        }
        Command::Publish { recipient, uri } => {
            let token_id = certify.publish_certificate(recipient, uri).await?;
            format!("Published certificate {}", token_id)
        }
        Command::Verify { token_id, signer } => {
            let token_id = U256::from(token_id);
            // Verifier hashes the content as stored on-chain
            let uri = certify.certificate(token_id).await?.uri;
            let (is_valid, username) = certify.verify_certificate(token_id, &uri, signer).await?;
            format_verification(is_valid, &username)
        }
        Command::List => format_certificates(&certify.list_certificates().await?),
        Command::Counter => certify.token_counter().await?.to_string(),
    };
    Ok(output)
}

/// Commands that send transactions and therefore need the private key.
pub fn requires_signer(command: &Command) -> bool {
    matches!(
        command,
        Command::Grant { .. } | Command::Revoke { .. } | Command::Publish { .. }
    )
}

pub fn format_verification(is_valid: bool, username: &str) -> String {
    if is_valid {
        format!("Certificate is Valid!\nSigned by {}", username)
    } else {
        "Certificate is not Valid!".to_owned()
    }
}

pub fn format_certificates(certificates: &[CertificateInfo]) -> String {
    let mut output = String::new();
    for certificate in certificates {
        let _ = writeln!(
            output,
            "{}\t{:?}\t{}",
            certificate.token_id, certificate.owner, certificate.uri
        );
    }
    output
}
