//! Cardkit Demo CLI
//!
//! Command-line interface for trying out cardkit: masking, validation,
//! accounts on file and customer-input encryption.

use anyhow::Result;
use cardkit_demo_cli::commands::{self, encrypt::EncryptOptions, mask::MaskMode, parse_field};
use cardkit_demo_cli::ui;
use cardkit_lib::context::PaymentContext;
use cardkit_lib::PaymentProductId;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cardkit-demo")]
#[command(about = "Cardkit Demo CLI - Try out card payment masking, validation and encryption", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a value with a display mask such as "{{9999}} {{9999}}"
    Mask {
        /// Mask pattern
        mask: String,

        /// Value to format
        value: String,

        /// Strip the mask instead of applying it
        #[arg(long, conflicts_with = "obfuscate")]
        remove: bool,

        /// Hide every input character
        #[arg(long)]
        obfuscate: bool,
    },

    /// Validate field values against a payment product document
    Validate {
        #[command(flatten)]
        input: RequestInput,
    },

    /// List the accounts on file in a product list document
    Accounts {
        /// Product list JSON file
        #[arg(short, long)]
        products: PathBuf,
    },

    /// Show which fields an account on file prefills
    Reconcile {
        /// Payment product JSON file
        #[arg(short, long)]
        product: PathBuf,

        /// Account on file id
        #[arg(short, long)]
        account_id: String,
    },

    /// Generate a demo platform key pair
    Keygen {
        /// Directory to write the key pair to
        #[arg(short, long)]
        out: PathBuf,

        /// Key id published with the public key
        #[arg(long, default_value = "demo-key")]
        key_id: String,
    },

    /// Validate and encrypt a payment request
    Encrypt {
        #[command(flatten)]
        input: RequestInput,

        /// Public key JSON file (keyId, publicKey)
        #[arg(long)]
        public_key: PathBuf,

        /// Store the card as an account on file
        #[arg(long)]
        tokenize: bool,

        /// Client session id sealed into the request
        #[arg(long, default_value = "demo-session")]
        session_id: String,
    },

    /// Open an encrypted customer input with a demo secret key
    Decrypt {
        /// Secret key file written by keygen
        #[arg(long)]
        secret: PathBuf,

        /// Encrypted customer input
        envelope: String,
    },

    /// List payment products of a live session
    Products {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Show one payment product of a live session
    Product {
        /// Payment product id
        id: PaymentProductId,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Identify the payment product of a card number prefix
    Iin {
        /// Card number or its first digits
        number: String,

        #[command(flatten)]
        context: ContextArgs,
    },
}

#[derive(Args)]
struct RequestInput {
    /// Payment product JSON file
    #[arg(short, long)]
    product: PathBuf,

    /// Pay with this account on file of the product
    #[arg(short, long)]
    account_id: Option<String>,

    /// Field value as FIELD=VALUE (repeatable)
    #[arg(short = 'f', long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Reference date for expiry checks (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Args)]
struct ContextArgs {
    /// Amount in minor units
    #[arg(long, default_value = "1000")]
    amount: i64,

    /// ISO 4217 currency code
    #[arg(long, default_value = "EUR")]
    currency: String,

    /// ISO 3166-1 alpha-2 country code
    #[arg(long, default_value = "NL")]
    country: String,

    /// Recurring payment
    #[arg(long)]
    recurring: bool,
}

impl ContextArgs {
    fn to_context(&self) -> PaymentContext {
        PaymentContext::new(self.amount, &self.currency, &self.country).with_recurring(self.recurring)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("cardkit_demo_cli=debug,cardkit_demo=debug,cardkit_lib=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("cardkit_demo_cli=info,cardkit_demo=info,cardkit_lib=warn")
            .with_writer(std::io::stderr)
            .init();
    }
    ui::init_colors();

    // Dispatch commands
    match cli.command {
        Commands::Mask {
            mask,
            value,
            remove,
            obfuscate,
        } => {
            let mode = if remove {
                MaskMode::Remove
            } else if obfuscate {
                MaskMode::Obfuscate
            } else {
                MaskMode::Apply
            };
            commands::mask::run(&mask, &value, mode, cli.json)?;
        }
        Commands::Validate { input } => {
            commands::validate::run(
                &input.product,
                input.account_id.as_deref(),
                &input.fields,
                input.today,
                cli.json,
            )?;
        }
        Commands::Accounts { products } => {
            commands::accounts::run(&products, cli.json)?;
        }
        Commands::Reconcile {
            product,
            account_id,
        } => {
            commands::reconcile::run(&product, &account_id, cli.json)?;
        }
        Commands::Keygen { out, key_id } => {
            commands::keys::keygen(&out, &key_id)?;
        }
        Commands::Encrypt {
            input,
            public_key,
            tokenize,
            session_id,
        } => {
            let options = EncryptOptions {
                product_path: &input.product,
                public_key_path: &public_key,
                account_id: input.account_id.as_deref(),
                fields: &input.fields,
                tokenize,
                session_id: &session_id,
                today: input.today,
            };
            commands::encrypt::run(&options, cli.json)?;
        }
        Commands::Decrypt { secret, envelope } => {
            commands::keys::decrypt(&secret, &envelope, cli.json)?;
        }
        Commands::Products { context } => {
            commands::online::products(&context.to_context(), cli.json).await?;
        }
        Commands::Product { id, context } => {
            commands::online::product(id, &context.to_context(), cli.json).await?;
        }
        Commands::Iin { number, context } => {
            commands::online::iin(&number, &context.to_context(), cli.json).await?;
        }
    }

    Ok(())
}
