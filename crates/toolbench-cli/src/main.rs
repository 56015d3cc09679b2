//! toolbench: developer utility toolbox CLI
//!
//! Crypto:
//!   encrypt [TEXT]          - password-encrypt text to a Base64 blob
//!   decrypt [BLOB]          - decrypt a blob produced by `encrypt`
//!   hash <FILE>             - SHA-1/256/512 checksums, optional verification
//!
//! Network:
//!   cidr <NETWORK>          - subnet summary for a CIDR block
//!   mask <VALUE>            - convert between prefix, subnet mask and wildcard
//!   hosts <COUNT>           - smallest subnet holding COUNT hosts
//!   dns <DOMAIN>            - normalized DNS records
//!   headers <URL>           - first-hop response headers (redirects not followed)
//!
//! Capacity:
//!   tps, storage, logrotate - throughput and disk footprint estimates
//!
//! Misc:
//!   random string|number    - CSPRNG strings and numbers
//!   config show             - display current configuration

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use secrecy::SecretString;
use serde::Serialize;
use std::io::Read;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use toolbench_calc::{
    estimate_storage, format_bytes, nodes_required, parse_size, random_numbers, random_string,
    tps, CharsetOptions, LogSourceTable, RotationPolicy, RotationSchedule, StorageInput, TimeUnit,
};
use toolbench_core::config::ToolbenchConfig;
use toolbench_core::types::{DigestAlgorithm, DnsProvider, HttpMethod, LogFormat};
use toolbench_crypto::{digest_file, CryptoError};
use toolbench_net::{
    check_headers, lookup, Ipv4Network, Prefix, RecordType, ReqwestFetcher, SystemResolver,
};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "toolbench",
    version,
    about = "Developer utility toolbox",
    long_about = "toolbench: encryption, checksums, subnet math, DNS and header checks, capacity estimates"
)]
struct Cli {
    /// Path to config.toml
    #[arg(long, short = 'c', env = "TOOLBENCH_CONFIG", default_value = "~/.config/toolbench/config.toml")]
    config: PathBuf,

    /// Log level filter (overrides config; RUST_LOG wins over both)
    #[arg(long, global = true)]
    log: Option<String>,

    /// Log output format (overrides config)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormatArg>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt text with a password (AES-256-GCM, PBKDF2 key)
    ///
    /// Reads TEXT from stdin when omitted. The password comes from
    /// TOOLBENCH_PASSWORD or an interactive prompt.
    Encrypt {
        text: Option<String>,
        #[command(flatten)]
        password: PasswordArgs,
    },

    /// Decrypt a Base64 blob produced by `encrypt`
    Decrypt {
        blob: Option<String>,
        #[command(flatten)]
        password: PasswordArgs,
    },

    /// Compute file checksums
    Hash {
        file: PathBuf,
        /// Algorithm to compute (repeatable; default from config)
        #[arg(long, short = 'a')]
        algorithm: Vec<DigestAlgorithm>,
        /// Expected hex digest; exits non-zero on mismatch
        #[arg(long)]
        expect: Option<String>,
    },

    /// Subnet summary for an IPv4 network (e.g. 192.168.1.10/24)
    Cidr { network: Ipv4Network },

    /// Convert a prefix length, subnet mask or wildcard mask
    Mask {
        /// `/24`, `24`, `255.255.255.0`, or a wildcard with --wildcard
        value: String,
        /// Treat a dotted VALUE as a wildcard mask
        #[arg(long)]
        wildcard: bool,
    },

    /// Smallest subnet with at least COUNT usable hosts
    Hosts { count: u64 },

    /// Look up DNS records
    Dns {
        domain: String,
        #[arg(long = "type", short = 't', default_value = "A")]
        record_type: RecordType,
        /// Upstream resolver (overrides config)
        #[arg(long, value_enum)]
        provider: Option<ProviderArg>,
    },

    /// Fetch response headers without following redirects
    Headers {
        url: String,
        /// Request method (overrides config)
        #[arg(long, value_enum)]
        method: Option<MethodArg>,
    },

    /// Transactions per second from a volume per time window
    Tps {
        transactions: f64,
        /// Window the volume was observed over
        #[arg(long, default_value = "day")]
        per: TimeUnit,
        /// Peak-to-average multiplier
        #[arg(long, default_value_t = 1.0)]
        peak: f64,
        /// Capacity of one node; prints the node count needed for peak
        #[arg(long)]
        node_capacity: Option<f64>,
    },

    /// Disk footprint of a retention window
    Storage {
        /// Daily ingest, e.g. `50GB`
        #[arg(long)]
        daily: String,
        #[arg(long, default_value_t = 30)]
        retention: u32,
        #[arg(long, default_value_t = 1)]
        replicas: u32,
        /// Stored/raw ratio in (0, 1]
        #[arg(long, default_value_t = 1.0)]
        compression: f64,
        /// Monthly ingest growth in percent
        #[arg(long, default_value_t = 0.0)]
        growth: f64,
    },

    /// Disk usage of a log rotation policy
    Logrotate {
        /// Log source as NAME=SIZE per day (repeatable)
        #[arg(long = "source", short = 's', required = true)]
        sources: Vec<String>,
        /// hourly, daily, weekly or size:<SIZE>
        #[arg(long, default_value = "daily")]
        schedule: RotationSchedule,
        /// Rotated files to keep
        #[arg(long, default_value_t = 7)]
        keep: u32,
        /// Compression ratio applied to rotated files
        #[arg(long)]
        compress: Option<f64>,
    },

    /// Random strings and numbers
    Random {
        #[command(subcommand)]
        action: RandomAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug)]
struct PasswordArgs {
    /// Password (prompted for when not set)
    #[arg(long, env = "TOOLBENCH_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand, Debug)]
enum RandomAction {
    /// Random string from the selected character classes
    String {
        /// Length (default from config)
        #[arg(long, short = 'l')]
        length: Option<usize>,
        #[arg(long)]
        no_lowercase: bool,
        #[arg(long)]
        no_uppercase: bool,
        #[arg(long)]
        no_digits: bool,
        /// Include symbols (also enabled by config)
        #[arg(long)]
        symbols: bool,
        /// Drop 0 O o 1 l I (also enabled by config)
        #[arg(long)]
        exclude_ambiguous: bool,
        /// How many strings to print
        #[arg(long, short = 'n', default_value_t = 1)]
        count: usize,
    },

    /// Random integers from an inclusive range
    Number {
        #[arg(long, allow_hyphen_values = true)]
        min: i64,
        #[arg(long, allow_hyphen_values = true)]
        max: i64,
        #[arg(long, short = 'n', default_value_t = 1)]
        count: usize,
        /// No repeated values
        #[arg(long)]
        unique: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogFormatArg {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ProviderArg {
    System,
    Google,
    Cloudflare,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MethodArg {
    Head,
    Get,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => Self::Text,
            LogFormatArg::Json => Self::Json,
        }
    }
}

impl From<ProviderArg> for DnsProvider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::System => Self::System,
            ProviderArg::Google => Self::Google,
            ProviderArg::Cloudflare => Self::Cloudflare,
        }
    }
}

impl From<MethodArg> for HttpMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Head => Self::Head,
            MethodArg::Get => Self::Get,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = expand_tilde(&cli.config);
    let mut config = ToolbenchConfig::load_or_default(&config_path)
        .with_context(|| format!("loading config: {}", config_path.display()))?;

    if let Some(level) = &cli.log {
        config.logging.level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format.into();
    }
    init_logging(&config.logging.level, config.logging.format);
    if !config_path.exists() {
        // The loader's warning fires before the subscriber exists
        tracing::warn!("config file not found: {}  (using defaults)", config_path.display());
    }

    let json = cli.json;
    match cli.command {
        Commands::Encrypt { text, password } => cmd_encrypt(text, &password),
        Commands::Decrypt { blob, password } => cmd_decrypt(blob, &password),
        Commands::Hash { file, algorithm, expect } => {
            cmd_hash(&config, &file, algorithm, expect.as_deref(), json)
        }
        Commands::Cidr { network } => cmd_cidr(&network, json),
        Commands::Mask { value, wildcard } => cmd_mask(&value, wildcard, json),
        Commands::Hosts { count } => cmd_hosts(count, json),
        Commands::Dns { domain, record_type, provider } => {
            if let Some(p) = provider {
                config.dns.provider = p.into();
            }
            cmd_dns(&config, &domain, record_type, json).await
        }
        Commands::Headers { url, method } => {
            if let Some(m) = method {
                config.http.method = m.into();
            }
            cmd_headers(&config, &url, json).await
        }
        Commands::Tps { transactions, per, peak, node_capacity } => {
            cmd_tps(transactions, per, peak, node_capacity, json)
        }
        Commands::Storage { daily, retention, replicas, compression, growth } => {
            let input = StorageInput {
                daily_bytes: parse_size(&daily)?,
                retention_days: retention,
                replication_factor: replicas,
                compression_ratio: compression,
                growth_percent_per_month: growth,
            };
            cmd_storage(&input, json)
        }
        Commands::Logrotate { sources, schedule, keep, compress } => {
            let policy = RotationPolicy {
                schedule,
                keep,
                compress_ratio: compress,
            };
            cmd_logrotate(&sources, &policy, json)
        }
        Commands::Random { action } => cmd_random(&config, action, json),
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &config_path),
    }
}

fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr = fmt::layer().with_writer(std::io::stderr);

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr.json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .init();
        }
    }
}

/// Expand `~` in path to the user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    match s.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var("HOME").unwrap_or_default();
            PathBuf::from(home).join(rest)
        }
        None => path.to_path_buf(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{rendered}");
    Ok(())
}

/// Positional argument, or all of stdin without the trailing newline.
fn arg_or_stdin(arg: Option<String>) -> Result<String> {
    match arg {
        Some(s) => Ok(s),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf.trim_end_matches(['\r', '\n']).to_string())
        }
    }
}

fn read_password(args: &PasswordArgs) -> Result<SecretString> {
    let password = match &args.password {
        Some(p) => p.clone(),
        None => rpassword::prompt_password("Password: ").context("reading password")?,
    };
    Ok(SecretString::from(password))
}

// ── `toolbench encrypt` / `decrypt` ───────────────────────────────────────────

fn cmd_encrypt(text: Option<String>, password: &PasswordArgs) -> Result<()> {
    let plaintext = arg_or_stdin(text)?;
    let password = read_password(password)?;
    let blob = toolbench_crypto::encrypt(&plaintext, &password).context("encrypting")?;
    println!("{blob}");
    Ok(())
}

fn cmd_decrypt(blob: Option<String>, password: &PasswordArgs) -> Result<()> {
    let blob = arg_or_stdin(blob)?;
    let password = read_password(password)?;
    let plaintext = toolbench_crypto::decrypt(&blob, &password).context("decrypting")?;
    println!("{plaintext}");
    Ok(())
}

// ── `toolbench hash` ──────────────────────────────────────────────────────────

fn cmd_hash(
    config: &ToolbenchConfig,
    file: &Path,
    mut algorithms: Vec<DigestAlgorithm>,
    expect: Option<&str>,
    json: bool,
) -> Result<()> {
    if algorithms.is_empty() {
        algorithms = config.digest.algorithms.clone();
    }
    let result = match digest_file(file, &algorithms, config.digest.max_file_bytes) {
        Err(CryptoError::FileTooLarge { size, limit }) => anyhow::bail!(
            "{} is {}; the limit is {} (raise digest.max_file_bytes)",
            file.display(),
            format_bytes(size),
            format_bytes(limit)
        ),
        other => other.with_context(|| format!("hashing {}", file.display()))?,
    };

    if json {
        print_json(&result)?;
    } else {
        for (algorithm, hex) in result.iter() {
            println!("{:<8} {hex}", algorithm.name());
        }
    }

    if let Some(expected) = expect {
        match result.find_match(expected) {
            Some(algorithm) => eprintln!("OK: matches {algorithm}"),
            None => anyhow::bail!(
                "checksum mismatch: {} matches none of the computed digests",
                expected.trim()
            ),
        }
    }
    Ok(())
}

// ── `toolbench cidr` / `mask` / `hosts` ───────────────────────────────────────

fn cmd_cidr(network: &Ipv4Network, json: bool) -> Result<()> {
    let s = network.summary();
    if json {
        return print_json(&s);
    }
    println!("cidr:          {}", s.cidr);
    println!("network:       {}", s.network);
    println!("broadcast:     {}", s.broadcast);
    println!("subnet mask:   {}", s.subnet_mask);
    println!("wildcard mask: {}", s.wildcard_mask);
    println!("usable range:  {} - {}", s.first_usable, s.last_usable);
    println!("total hosts:   {}", s.total_hosts);
    println!("usable hosts:  {}", s.usable_hosts);
    Ok(())
}

#[derive(Serialize)]
struct MaskReport {
    prefix: u8,
    subnet_mask: Ipv4Addr,
    wildcard_mask: Ipv4Addr,
    total_hosts: u64,
    usable_hosts: u64,
}

impl From<Prefix> for MaskReport {
    fn from(p: Prefix) -> Self {
        Self {
            prefix: p.bits(),
            subnet_mask: p.subnet_mask(),
            wildcard_mask: p.wildcard_mask(),
            total_hosts: p.total_hosts(),
            usable_hosts: p.usable_hosts(),
        }
    }
}

fn print_mask(report: &MaskReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }
    println!("prefix:        /{}", report.prefix);
    println!("subnet mask:   {}", report.subnet_mask);
    println!("wildcard mask: {}", report.wildcard_mask);
    println!("total hosts:   {}", report.total_hosts);
    println!("usable hosts:  {}", report.usable_hosts);
    Ok(())
}

fn cmd_mask(value: &str, wildcard: bool, json: bool) -> Result<()> {
    let prefix = match value.parse::<Ipv4Addr>() {
        Ok(addr) if wildcard => Prefix::from_wildcard(addr)?,
        Ok(addr) => Prefix::from_mask(addr)?,
        Err(_) => Prefix::parse(value)?,
    };
    print_mask(&prefix.into(), json)
}

fn cmd_hosts(count: u64, json: bool) -> Result<()> {
    let prefix = Prefix::for_host_count(count)?;
    print_mask(&prefix.into(), json)
}

// ── `toolbench dns` ───────────────────────────────────────────────────────────

async fn cmd_dns(
    config: &ToolbenchConfig,
    domain: &str,
    record_type: RecordType,
    json: bool,
) -> Result<()> {
    let resolver = SystemResolver::from_config(&config.dns).context("building resolver")?;
    let result = match lookup(&resolver, domain, record_type).await {
        Ok(r) => r,
        Err(e) => anyhow::bail!("{} [{}]", e.user_message(domain, record_type), e.code()),
    };

    if json {
        return print_json(&result);
    }
    for record in &result.records {
        match record.priority {
            Some(priority) => println!("{:<6} {priority:<5} {}", result.record_type.as_str(), record.value),
            None => println!("{:<6} {}", result.record_type.as_str(), record.value),
        }
    }
    Ok(())
}

// ── `toolbench headers` ───────────────────────────────────────────────────────

async fn cmd_headers(config: &ToolbenchConfig, url: &str, json: bool) -> Result<()> {
    let fetcher = ReqwestFetcher::new(&config.http)?;
    let report = check_headers(&fetcher, url).await?;

    if json {
        return print_json(&report);
    }
    println!(
        "{} {}",
        report.status,
        report.reason.as_deref().unwrap_or_default()
    );
    for (name, value) in &report.headers {
        println!("{name}: {value}");
    }
    if let Some(location) = &report.redirect_location {
        eprintln!("redirects to {location} (not followed)");
    }
    Ok(())
}

// ── Capacity calculators ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct TpsOutput {
    #[serde(flatten)]
    report: toolbench_calc::TpsReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes_required: Option<u64>,
}

fn cmd_tps(
    transactions: f64,
    per: TimeUnit,
    peak: f64,
    node_capacity: Option<f64>,
    json: bool,
) -> Result<()> {
    let report = tps(transactions, per, peak)?;
    let nodes = node_capacity
        .map(|cap| nodes_required(report.peak_tps, cap))
        .transpose()?;

    if json {
        return print_json(&TpsOutput {
            report,
            nodes_required: nodes,
        });
    }
    println!("average tps: {:.2}", report.average_tps);
    println!("peak tps:    {:.2}", report.peak_tps);
    println!("per minute:  {:.0}", report.per_minute);
    println!("per hour:    {:.0}", report.per_hour);
    println!("per day:     {:.0}", report.per_day);
    if let Some(n) = nodes {
        println!("nodes:       {n}");
    }
    Ok(())
}

fn cmd_storage(input: &StorageInput, json: bool) -> Result<()> {
    let estimate = estimate_storage(input)?;
    if json {
        return print_json(&estimate);
    }
    println!("raw:      {}", format_bytes(estimate.raw_bytes));
    println!("stored:   {}", format_bytes(estimate.stored_bytes));
    println!("monthly:  {}", format_bytes(estimate.monthly_bytes));
    Ok(())
}

fn cmd_logrotate(sources: &[String], policy: &RotationPolicy, json: bool) -> Result<()> {
    let mut table = LogSourceTable::new();
    for source in sources {
        let (name, size) = source
            .split_once('=')
            .with_context(|| format!("expected NAME=SIZE, got {source:?}"))?;
        table.add(name.trim(), parse_size(size)?);
    }
    let estimate = table.estimate(policy)?;

    if json {
        return print_json(&estimate);
    }
    for source in table.iter() {
        println!("  {:<16} {}/day", source.name, format_bytes(source.daily_bytes));
    }
    println!("total ingest:   {}/day", format_bytes(table.total_daily_bytes()));
    println!("per file:       {}", format_bytes(estimate.file_bytes));
    println!("rotated files:  {}", format_bytes(estimate.retained_bytes));
    println!("disk total:     {}", format_bytes(estimate.total_bytes));
    println!("files on disk:  {}", estimate.files_on_disk);
    println!("coverage:       {:.1} hours", estimate.coverage_hours);
    Ok(())
}

// ── `toolbench random` ────────────────────────────────────────────────────────

fn cmd_random(config: &ToolbenchConfig, action: RandomAction, json: bool) -> Result<()> {
    match action {
        RandomAction::String {
            length,
            no_lowercase,
            no_uppercase,
            no_digits,
            symbols,
            exclude_ambiguous,
            count,
        } => {
            let options = CharsetOptions {
                lowercase: !no_lowercase,
                uppercase: !no_uppercase,
                digits: !no_digits,
                symbols: symbols || config.random.symbols,
                exclude_ambiguous: exclude_ambiguous || config.random.exclude_ambiguous,
            };
            let length = length.unwrap_or(config.random.default_length);
            if count == 0 {
                anyhow::bail!("count must be at least 1");
            }
            let strings = (0..count)
                .map(|_| random_string(length, &options))
                .collect::<Result<Vec<_>, _>>()?;
            if json {
                return print_json(&strings);
            }
            for s in strings {
                println!("{s}");
            }
        }
        RandomAction::Number { min, max, count, unique } => {
            let numbers = random_numbers(min, max, count, unique)?;
            if json {
                return print_json(&numbers);
            }
            for n in numbers {
                println!("{n}");
            }
        }
    }
    Ok(())
}

// ── `toolbench config show` ───────────────────────────────────────────────────

fn cmd_config_show(config: &ToolbenchConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = config.to_toml_string().context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}
