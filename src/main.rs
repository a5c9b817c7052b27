use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::*;
use std::net::IpAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use cfhunt::{
    address::{expand_lines, read_candidate_lines},
    exit_codes,
    logging::Logger,
    output::{self, write_address_list, ResultArtifact},
    resolve::{harvest, DomainResolver},
    ExclusionList, HuntConfig, HuntError, HuntResult, ProbeClassifier, ProbeScheduler, RangeFilter,
};

fn build_cli() -> Command {
    Command::new("cfhunt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Find CloudFlare edge addresses outside the published ranges")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (defaults to ~/.cfhunt.toml when present)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output; repeat for trace level")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("expand")
                .about("Expand a list of addresses and CIDR blocks into a sorted, deduplicated list")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("FILE")
                        .default_value("ip.txt")
                        .help("Addresses and CIDR blocks, one per line"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Expanded list (defaults to <input_dir>/ip0.txt)"),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve domains through several DNS servers and collect unpublished addresses")
                .arg(
                    Arg::new("domains")
                        .short('d')
                        .long("domains")
                        .value_name("FILE")
                        .default_value("Domain.txt")
                        .help("Domains, one per line"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("File the addresses are appended to (defaults to <input_dir>/Domain2IP.txt)"),
                )
                .arg(
                    Arg::new("dns-server")
                        .long("dns-server")
                        .value_name("IP")
                        .help("DNS server to query; repeat for several")
                        .value_parser(clap::value_parser!(IpAddr))
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("probe")
                .about("Probe a candidate list and append confirmed CloudFlare edges")
                .arg(
                    Arg::new("retries")
                        .value_name("RETRIES")
                        .help("Attempts per address")
                        .required(true)
                        .value_parser(clap::value_parser!(u32))
                        .index(1),
                )
                .arg(
                    Arg::new("workers")
                        .value_name("WORKERS")
                        .help("Concurrent probes")
                        .required(true)
                        .value_parser(clap::value_parser!(usize))
                        .index(2),
                )
                .arg(
                    Arg::new("label")
                        .value_name("LABEL")
                        .help("Reads <input_dir>/LABEL.txt, appends to <output_dir>/LABEL.txt")
                        .required(true)
                        .index(3),
                )
                .arg(
                    Arg::new("port")
                        .value_name("PORT")
                        .help("Target port [default: 443]")
                        .value_parser(clap::value_parser!(u16))
                        .index(4),
                )
                .arg(
                    Arg::new("timeout")
                        .short('t')
                        .long("timeout")
                        .value_name("MS")
                        .help("Timeout per attempt in milliseconds")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .help("Host header sent with every probe"),
                )
                .arg(
                    Arg::new("token")
                        .long("token")
                        .value_name("TOKEN")
                        .help("Substring expected in the Server header"),
                )
                .arg(
                    Arg::new("no-exclude")
                        .long("no-exclude")
                        .help("Probe addresses inside the published ranges too")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-progress")
                        .long("no-progress")
                        .help("Hide the progress bar")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the run summary as JSON")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("ulimit")
                        .short('u')
                        .long("ulimit")
                        .value_name("LIMIT")
                        .help("Raise the open file limit to this value")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
}

// Ulimit adjustment for Unix systems
#[cfg(unix)]
fn adjust_ulimit_size(ulimit: Option<u64>) -> u64 {
    use rlimit::Resource;

    if let Some(limit) = ulimit {
        if Resource::NOFILE.set(limit, limit).is_ok() {
            println!(
                "{} {}",
                "[~] Raised open file limit to".bright_blue(),
                limit.to_string().bright_cyan().bold()
            );
        } else {
            eprintln!("{}", "[!] Failed to set the open file limit".bright_red());
        }
    }

    match Resource::NOFILE.get() {
        Ok((soft, _)) => soft,
        Err(_) => {
            log::warn!("Could not read the open file limit");
            u64::MAX
        }
    }
}

#[cfg(not(unix))]
fn adjust_ulimit_size(_ulimit: Option<u64>) -> u64 {
    u64::MAX
}

fn load_config(matches: &ArgMatches) -> HuntResult<HuntConfig> {
    match matches.get_one::<String>("config") {
        Some(path) => {
            let config = HuntConfig::from_toml_file(path)?;
            log::info!("Loaded config from {}", path);
            Ok(config)
        }
        None => Ok(HuntConfig::load_default_config()),
    }
}

fn run_expand(config: &HuntConfig, matches: &ArgMatches) -> HuntResult<i32> {
    let input = matches
        .get_one::<String>("input")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ip.txt"));
    let output = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.candidate_path("ip0"));

    let candidates = expand_lines(read_candidate_lines(&input)?)?;
    let written = write_address_list(&output, &candidates)?;

    println!(
        "{} {} addresses written to {}",
        "[+]".bright_green(),
        written.to_string().bright_cyan(),
        output.display()
    );
    Ok(exit_codes::COMPLETED)
}

async fn run_resolve(config: &HuntConfig, matches: &ArgMatches) -> HuntResult<i32> {
    let domains_path = matches
        .get_one::<String>("domains")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("Domain.txt"));
    let output = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.candidate_path("Domain2IP"));
    let servers: Vec<IpAddr> = match matches.get_many::<IpAddr>("dns-server") {
        Some(values) => values.copied().collect(),
        None => config.dns_servers.clone(),
    };
    if servers.is_empty() {
        return Err(HuntError::Config("No DNS servers configured".to_string()));
    }

    let domains = read_candidate_lines(&domains_path)?;
    let resolver = DomainResolver::hickory(servers, config.dns_timeout_duration());
    let report = harvest(&resolver, &domains, &ExclusionList::published(), &output).await?;

    println!(
        "{} {} domains resolved to {} addresses, {} inside published ranges",
        "[~]".bright_blue(),
        report.domains,
        report.resolved,
        report.excluded
    );
    println!(
        "{} {} addresses appended to {}",
        "[+]".bright_green(),
        report.written.to_string().bright_cyan(),
        output.display()
    );
    Ok(exit_codes::COMPLETED)
}

async fn run_probe(mut config: HuntConfig, matches: &ArgMatches) -> HuntResult<i32> {
    if let Some(&retries) = matches.get_one::<u32>("retries") {
        config = config.with_retries(retries);
    }
    if let Some(&workers) = matches.get_one::<usize>("workers") {
        config = config.with_workers(workers);
    }
    if let Some(&port) = matches.get_one::<u16>("port") {
        config = config.with_port(port);
    }
    if let Some(&timeout) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(timeout);
    }
    if let Some(host) = matches.get_one::<String>("host") {
        config = config.with_host_header(host.clone());
    }
    if let Some(token) = matches.get_one::<String>("token") {
        config = config.with_signature(token.clone());
    }
    if matches.get_flag("no-progress") {
        config.progress = false;
    }
    config.validate()?;

    let label = matches
        .get_one::<String>("label")
        .ok_or_else(|| HuntError::Config("A candidate label is required".to_string()))?;

    let fd_limit = adjust_ulimit_size(matches.get_one::<u64>("ulimit").copied());
    if config.workers as u64 > fd_limit {
        log::warn!(
            "{} workers exceed the open file limit of {}; consider --ulimit",
            config.workers,
            fd_limit
        );
    }

    // Everything that can fail on input or output is checked before probing
    let candidates = expand_lines(read_candidate_lines(config.candidate_path(label))?)?;
    let candidates = if matches.get_flag("no-exclude") {
        candidates
    } else {
        let exclusions = ExclusionList::published();
        RangeFilter::new(&exclusions).filter(candidates).kept
    };

    let artifact_path = config.artifact_path(label);
    let artifact = Arc::new(ResultArtifact::open(&artifact_path).await?);
    let classifier = ProbeClassifier::from_config(&config)?;
    let scheduler = ProbeScheduler::new(config.workers).with_progress(config.progress);

    let token = scheduler.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{}", "[!] Interrupted, finishing in-flight probes".bright_yellow());
            token.cancel();
        }
    });

    let summary = scheduler.run(&candidates, classifier, artifact.clone()).await;
    if let Err(e) = artifact.close().await {
        log::error!("Failed to sync {}: {}", artifact_path.display(), e);
    }

    if matches.get_flag("json") {
        println!("{}", output::summary_json(&summary)?);
    } else {
        output::print_summary(&summary, &artifact_path);
    }

    Ok(summary.exit_code())
}

async fn run(matches: &ArgMatches) -> HuntResult<i32> {
    let config = load_config(matches)?;

    match matches.subcommand() {
        Some(("expand", sub)) => run_expand(&config, sub),
        Some(("resolve", sub)) => run_resolve(&config, sub).await,
        Some(("probe", sub)) => run_probe(config, sub).await,
        _ => Err(HuntError::Config("Unknown command".to_string())),
    }
}

fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();

    Logger::init(Logger::level_for(
        matches.get_count("verbose"),
        matches.get_flag("quiet"),
    ));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;
    let code = match runtime.block_on(run(&matches)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "[!]".bright_red(), e);
            e.exit_code()
        }
    };

    // In-flight probes are abandoned on exit
    runtime.shutdown_background();
    process::exit(code);
}
