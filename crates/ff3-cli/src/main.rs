//! Command-line interface for the FF3-1 engine.

#![forbid(unsafe_code)]

use aes_core::{encrypt_block, expand_key};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use ff3_core::params::{max_len_for, min_len_for};
use ff3_core::{
    DomainParams, EncryptionService, Ff3Cipher, PanLayout, Protected, StaticKeyProvider,
    TracingAuditSink, Tweak,
};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// FF3-1 format-preserving encryption CLI.
#[derive(Parser)]
#[command(
    name = "ff3",
    version,
    author,
    about = "FF3-1 format-preserving encryption (NIST SP 800-38G Rev. 1)"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a numeral string.
    Enc {
        /// Plaintext numeral.
        value: String,
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        domain: DomainArgs,
        /// Tweak as 14 hex characters; a fresh one is generated when omitted.
        #[arg(long, value_name = "HEX")]
        tweak: Option<String>,
        /// Optional RNG seed for reproducible tweak generation.
        #[arg(long)]
        seed: Option<u64>,
        /// Print a JSON record instead of plain text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Decrypt a numeral string with the tweak used to encrypt it.
    Dec {
        /// Ciphertext numeral.
        value: String,
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        domain: DomainArgs,
        /// Tweak as 14 hex characters.
        #[arg(long, value_name = "HEX")]
        tweak: String,
    },
    /// Tokenize the middle digits of a card number, keeping BIN and last four.
    PanEnc {
        /// Card number; spaces and dashes are preserved.
        pan: String,
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        layout: LayoutArgs,
        /// Tweak as 14 hex characters; a fresh one is generated when omitted.
        #[arg(long, value_name = "HEX")]
        tweak: Option<String>,
        /// Optional RNG seed for reproducible tweak generation.
        #[arg(long)]
        seed: Option<u64>,
        /// Print a JSON record instead of plain text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Recover a card number tokenized with `pan-enc`.
    PanDec {
        /// Tokenized card number.
        pan: String,
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        layout: LayoutArgs,
        /// Tweak as 14 hex characters.
        #[arg(long, value_name = "HEX")]
        tweak: String,
    },
    /// Generate random tweaks.
    Tweak {
        /// Number of tweaks to print.
        #[arg(long, default_value_t = 1)]
        count: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Verify the engine against FIPS-197 and NIST FF3-1 reference vectors.
    Check,
    /// Run a local demo: random key, encrypt random card numbers, decrypt back.
    Demo {
        /// Number of values to encrypt.
        #[arg(long, default_value_t = 4)]
        samples: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct KeyArgs {
    /// AES-256 key as 64 hex characters.
    #[arg(long, value_name = "HEX", env = "FF3_KEY_HEX", hide_env_values = true)]
    key_hex: String,
    /// Key id reported in audit events.
    #[arg(long, default_value = "cli")]
    key_id: String,
}

#[derive(Args)]
struct DomainArgs {
    /// Numeral radix (2..=36).
    #[arg(long, default_value_t = 10)]
    radix: u32,
    /// Shortest accepted numeral; defaults to the smallest NIST-compliant length.
    #[arg(long)]
    min_len: Option<usize>,
    /// Longest accepted numeral; defaults to 19 for radix 10, the NIST limit otherwise.
    #[arg(long)]
    max_len: Option<usize>,
}

impl DomainArgs {
    fn params(&self) -> Result<DomainParams> {
        let min_len = self.min_len.unwrap_or_else(|| min_len_for(self.radix));
        let max_len = self.max_len.unwrap_or_else(|| {
            if self.radix == 10 {
                DomainParams::pan().max_len()
            } else {
                max_len_for(self.radix)
            }
        });
        DomainParams::new(self.radix, min_len, max_len).context("invalid domain parameters")
    }
}

#[derive(Args)]
struct LayoutArgs {
    /// Leading digits left in the clear.
    #[arg(long, default_value_t = 6)]
    keep_leading: usize,
    /// Trailing digits left in the clear.
    #[arg(long, default_value_t = 4)]
    keep_trailing: usize,
}

impl LayoutArgs {
    fn layout(&self) -> PanLayout {
        PanLayout {
            keep_leading: self.keep_leading,
            keep_trailing: self.keep_trailing,
        }
    }
}

type CliService = EncryptionService<StaticKeyProvider, TracingAuditSink>;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Enc {
            value,
            key,
            domain,
            tweak,
            seed,
            json,
        } => cmd_enc(&value, &key, &domain, tweak.as_deref(), seed, json),
        Commands::Dec {
            value,
            key,
            domain,
            tweak,
        } => cmd_dec(&value, &key, &domain, &tweak),
        Commands::PanEnc {
            pan,
            key,
            layout,
            tweak,
            seed,
            json,
        } => cmd_pan_enc(&pan, &key, &layout, tweak.as_deref(), seed, json),
        Commands::PanDec {
            pan,
            key,
            layout,
            tweak,
        } => cmd_pan_dec(&pan, &key, &layout, &tweak),
        Commands::Tweak { count, seed } => cmd_tweak(count, seed),
        Commands::Check => cmd_check(),
        Commands::Demo { samples, seed } => cmd_demo(samples, seed),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_enc(
    value: &str,
    key: &KeyArgs,
    domain: &DomainArgs,
    tweak_hex: Option<&str>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let service = build_service(key, seeded_rng(seed))?.with_params(domain.params()?);
    let protected = match tweak_hex {
        Some(hex_str) => {
            let tweak = parse_tweak(hex_str)?;
            let value = service.encrypt_with_tweak(value, &key.key_id, &tweak)?;
            Protected { value, tweak }
        }
        None => service.encrypt(value, &key.key_id)?,
    };
    print_protected(&protected, json)
}

fn cmd_dec(value: &str, key: &KeyArgs, domain: &DomainArgs, tweak_hex: &str) -> Result<()> {
    let service = build_service(key, seeded_rng(None))?.with_params(domain.params()?);
    let tweak = parse_tweak(tweak_hex)?;
    println!("{}", service.decrypt(value, &key.key_id, &tweak)?);
    Ok(())
}

fn cmd_pan_enc(
    pan: &str,
    key: &KeyArgs,
    layout: &LayoutArgs,
    tweak_hex: Option<&str>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let service = build_service(key, seeded_rng(seed))?.with_pan_layout(layout.layout());
    let tweak = match tweak_hex {
        Some(hex_str) => parse_tweak(hex_str)?,
        None => service.generate_tweak(),
    };
    let value = service.encrypt_pan(pan, &key.key_id, &tweak)?;
    print_protected(&Protected { value, tweak }, json)
}

fn cmd_pan_dec(pan: &str, key: &KeyArgs, layout: &LayoutArgs, tweak_hex: &str) -> Result<()> {
    let service = build_service(key, seeded_rng(None))?.with_pan_layout(layout.layout());
    let tweak = parse_tweak(tweak_hex)?;
    println!("{}", service.decrypt_pan(pan, &key.key_id, &tweak)?);
    Ok(())
}

fn cmd_tweak(count: usize, seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    for _ in 0..count {
        println!("{}", Tweak::generate(&mut rng));
    }
    Ok(())
}

/// `(key, tweak, plaintext, ciphertext, max_len)` from the NIST FF3-1 samples.
const FF3_1_VECTORS: [(&str, &str, &str, &str, usize); 3] = [
    (
        "2DE79D232DF5585D68CE47882AE256D6",
        "CBD09280979564",
        "3992520240",
        "8901801106",
        19,
    ),
    (
        "F62EDB777A671075D47563F3A1E9AC797AA706A2D8E02FC8",
        "493B8451BF6716",
        "4406616808",
        "1807744762",
        19,
    ),
    (
        "01C63017111438F7FC8E24EB16C71AB5",
        "C4E822DCD09F27",
        "60761757463116869318437658042297305934914824457484538562",
        "35637144092473838892796702739628394376915177448290847293",
        56,
    ),
];

/// FIPS-197 Appendix C.3 (AES-256).
const AES256_VECTOR: (&str, &str, &str) = (
    "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
    "00112233445566778899aabbccddeeff",
    "8ea2b7ca516745bfeafc49904b496089",
);

fn cmd_check() -> Result<()> {
    let (key_hex, plain_hex, cipher_hex) = AES256_VECTOR;
    let key = hex::decode(key_hex).context("decode AES key")?;
    let round_keys = expand_key(&key)?;
    let mut block = [0u8; 16];
    block.copy_from_slice(&hex::decode(plain_hex).context("decode AES block")?);
    if hex::encode(encrypt_block(&block, &round_keys)) != cipher_hex {
        bail!("AES-256 output does not match FIPS-197");
    }

    for (i, &(key_hex, tweak_hex, pt, ct, max_len)) in FF3_1_VECTORS.iter().enumerate() {
        let key = hex::decode(key_hex).context("decode FF3-1 key")?;
        let cipher = Ff3Cipher::new(&key, DomainParams::new(10, 6, max_len)?)?;
        let tweak = parse_tweak(tweak_hex)?;
        if cipher.encrypt(pt, &tweak)? != ct {
            bail!("FF3-1 vector {} failed to encrypt", i + 1);
        }
        if cipher.decrypt(ct, &tweak)? != pt {
            bail!("FF3-1 vector {} failed to decrypt", i + 1);
        }
        tracing::debug!(vector = i + 1, "FF3-1 vector verified");
    }
    println!("all {} reference vectors passed", FF3_1_VECTORS.len() + 1);
    Ok(())
}

fn cmd_demo(samples: usize, seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key_bytes = [0u8; 32];
    rng.fill_bytes(&mut key_bytes);
    let keys = StaticKeyProvider::new().with_key("demo", &key_bytes);
    let service = EncryptionService::with_rng(
        keys,
        TracingAuditSink,
        ChaCha20Rng::from_seed(derive_seed(&mut rng)),
    );

    println!("demo key: {}", hex::encode(key_bytes));
    for _ in 0..samples {
        let pan = random_pan(&mut rng);
        let protected = service.encrypt(&pan, "demo")?;
        let decrypted = service.decrypt(&protected.value, "demo", &protected.tweak)?;
        println!(
            "plaintext: {pan}  ciphertext: {}  tweak: {}",
            protected.value, protected.tweak
        );
        if decrypted != pan {
            bail!("demo roundtrip failed");
        }
    }
    Ok(())
}

fn build_service(key: &KeyArgs, rng: ChaCha20Rng) -> Result<CliService> {
    let mut keys = StaticKeyProvider::new();
    keys.insert_hex(key.key_id.clone(), &key.key_hex)
        .context("decode key hex")?;
    Ok(EncryptionService::with_rng(keys, TracingAuditSink, rng))
}

fn parse_tweak(hex_str: &str) -> Result<Tweak> {
    Tweak::from_hex(hex_str).context("parse tweak")
}

fn print_protected(protected: &Protected, json: bool) -> Result<()> {
    if json {
        let record = json!({
            "algorithm": ff3_core::ALGORITHM,
            "value": protected.value,
            "tweak": protected.tweak,
        });
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", protected.value);
        println!("tweak: {}", protected.tweak);
    }
    Ok(())
}

fn random_pan(rng: &mut impl RngCore) -> String {
    (0..16)
        .map(|_| char::from(b'0' + (rng.next_u32() % 10) as u8))
        .collect()
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    let mut seed_bytes = [0u8; 32];
    match seed {
        Some(value) => seed_bytes[..8].copy_from_slice(&value.to_le_bytes()),
        None => rand::rngs::OsRng.fill_bytes(&mut seed_bytes),
    }
    ChaCha20Rng::from_seed(seed_bytes)
}

fn derive_seed(rng: &mut impl RngCore) -> [u8; 32] {
    let mut seed_bytes = [0u8; 32];
    rng.fill_bytes(&mut seed_bytes);
    seed_bytes
}
