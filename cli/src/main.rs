//! Nomen command-line tool
//!
//! Claims an alias end to end with a file-backed signing key: keypair
//! generation, the two-step claim itself and confirmation lookups.

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use ed25519_dalek::{Signer, SigningKey};
use nomen_claim::{
    ClaimDraft, ClaimOrchestrator, ClaimOutcome, SignerError, WalletSigner,
};
use nomen_client::{NodeClient, CONFIRMATION_DEPTH, DEFAULT_NODE_URL};
use nomen_types::{SignedTransaction, TxId, UnsignedTransaction};
use rand_core::OsRng;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Parser)]
#[command(name = "nomen")]
#[command(about = "Claim a human-readable alias on the Nomen ledger")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new Ed25519 account keypair
    Keygen {
        /// Output directory for keys
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Key name/prefix
        #[arg(short, long, default_value = "account")]
        name: String,
    },

    /// Claim an alias and bind both identities to it
    Claim {
        /// The alias name to claim
        #[arg(long)]
        name: String,

        /// Path to the account private key file (hex)
        #[arg(long)]
        key_file: PathBuf,

        /// Hex-encoded social-network public key to bind
        #[arg(long)]
        social_key: String,

        /// Node endpoint (defaults to the public node)
        #[arg(long)]
        node: Option<Url>,

        /// Poll until the binding transaction is settled before exiting
        #[arg(long)]
        wait: bool,
    },

    /// Look up the confirmation state of a transaction
    Status {
        /// Transaction id
        #[arg(long)]
        tx: String,

        /// Node endpoint (defaults to the public node)
        #[arg(long)]
        node: Option<Url>,
    },
}

/// File-backed signer for CLI use. Wallet extensions fill this role in the
/// browser flow; here the key simply lives next to the user.
struct LocalSigner {
    key: SigningKey,
    node_endpoint: Option<Url>,
}

impl LocalSigner {
    fn from_key_file(path: &Path, node_endpoint: Option<Url>) -> Result<Self> {
        let hex_key = fs::read_to_string(path)
            .with_context(|| format!("failed to read key file {}", path.display()))?;
        let bytes = hex::decode(hex_key.trim()).context("key file is not valid hex")?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| anyhow::anyhow!("private key must be exactly 32 bytes"))?;
        Ok(Self {
            key: SigningKey::from_bytes(&bytes),
            node_endpoint,
        })
    }

    fn public_key_hex(&self) -> String {
        hex::encode(self.key.verifying_key().to_bytes())
    }
}

#[async_trait]
impl WalletSigner for LocalSigner {
    async fn sign(&self, tx: UnsignedTransaction) -> Result<SignedTransaction, SignerError> {
        let signature = self.key.sign(&tx.signing_payload());
        Ok(SignedTransaction::new(tx, signature.to_bytes()))
    }

    fn node_endpoint(&self) -> Option<Url> {
        self.node_endpoint.clone()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen { output, name } => keygen(&output, &name),
        Commands::Claim {
            name,
            key_file,
            social_key,
            node,
            wait,
        } => claim(name, &key_file, social_key, node, wait).await,
        Commands::Status { tx, node } => status(&tx, node).await,
    }
}

fn keygen(output: &Path, name: &str) -> Result<()> {
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory {}", output.display()))?;

    let signing_key = SigningKey::generate(&mut OsRng);
    let public_hex = hex::encode(signing_key.verifying_key().to_bytes());

    let private_path = output.join(format!("{name}.key"));
    let public_path = output.join(format!("{name}.pub"));
    fs::write(&private_path, hex::encode(signing_key.to_bytes()))
        .with_context(|| format!("failed to write {}", private_path.display()))?;
    fs::write(&public_path, &public_hex)
        .with_context(|| format!("failed to write {}", public_path.display()))?;

    println!("private key: {}", private_path.display());
    println!("public key:  {}", public_path.display());
    println!("address:     {}", nomen_identity::ledger_address(&public_hex));
    Ok(())
}

async fn claim(
    name: String,
    key_file: &Path,
    social_key: String,
    node: Option<Url>,
    wait: bool,
) -> Result<()> {
    let signer = LocalSigner::from_key_file(key_file, node.clone())?;
    let node_url = node
        .map(|u| u.to_string())
        .unwrap_or_else(|| DEFAULT_NODE_URL.to_string());
    let client = NodeClient::new(&node_url)?;

    let draft = ClaimDraft {
        name,
        primary_public_key: signer.public_key_hex(),
        secondary_public_key: social_key,
    };

    println!("claim alias {}", draft.name);
    println!("> ledger:   {}", nomen_identity::ledger_address(&draft.primary_public_key));
    println!(
        "> social:   {}",
        nomen_identity::shorten(
            &nomen_identity::social_encoding(&draft.secondary_public_key),
            16,
            ":"
        )
    );

    let (orchestrator, mut events) = ClaimOrchestrator::new(Arc::new(client.clone()), Arc::new(signer));
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event.tx_id {
                Some(tx_id) => println!("> {}... (tx {tx_id})", event.phase),
                None => println!("> {}...", event.phase),
            }
        }
    });

    let result = orchestrator.run(&draft).await;
    let _ = printer.await;

    match result {
        Ok(ClaimOutcome::Claimed { alias, tx_id }) => {
            println!(
                "claimed '{}' (alias id {}) - transaction {}",
                alias.name, alias.alias_id, tx_id
            );
            if wait {
                println!(
                    "waiting for {CONFIRMATION_DEPTH} confirmations (the name is fully available once settled)..."
                );
                let confirmation = client
                    .wait_for_confirmation(&tx_id, CONFIRMATION_DEPTH, Duration::from_secs(5))
                    .await?;
                println!("settled with {} confirmations", confirmation.confirmations);
            }
            Ok(())
        }
        Ok(ClaimOutcome::NotReady(readiness)) => {
            anyhow::bail!("claim is not ready: {readiness:?}")
        }
        Err(err) => {
            if let Some(alias) = err.created_alias() {
                eprintln!(
                    "note: alias '{}' (id {}) was created; re-run can resume from the transfer",
                    alias.name, alias.alias_id
                );
            }
            eprintln!("{}", err.user_message());
            Err(err.into())
        }
    }
}

async fn status(tx: &str, node: Option<Url>) -> Result<()> {
    use nomen_client::NodeApi;

    let node_url = node
        .map(|u| u.to_string())
        .unwrap_or_else(|| DEFAULT_NODE_URL.to_string());
    let client = NodeClient::new(&node_url)?;
    let confirmation = client.get_transaction(&TxId::new(tx)).await?;
    println!(
        "transaction {}: {:?} ({} confirmations)",
        confirmation.tx_id, confirmation.status, confirmation.confirmations
    );
    Ok(())
}
