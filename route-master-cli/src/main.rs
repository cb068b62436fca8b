//! RouteMaster CLI: plans zone delegation and provisions the scoped Route 53
//! roles in the zone account.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::{debug, LevelFilter};
use route_master_delegation::{
    build_match_sets, classify, extract_namespace_domain, normalize_domain, plan,
    AccountContext, ApplyOptions, DomainClass, HostedZoneClient, HostedZoneListing,
    ProvisioningConfig, ProvisioningPlan, RouteMasterService,
};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const EXIT_ERROR: u8 = 1;
const EXIT_REFUSED: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "route-master", version, about = "Cross-account Route 53 delegation within an AWS Organization")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the provisioning plan as JSON
    Plan {
        #[command(flatten)]
        input: PlanInput,
    },
    /// Create or update the planned roles in the zone account
    Apply {
        #[command(flatten)]
        input: PlanInput,
        /// Apply without asking for confirmation
        #[arg(long)]
        yes: bool,
        /// Leave roles that already exist untouched
        #[arg(long)]
        keep_existing: bool,
    },
    /// Show how domains are classified and matched
    Classify {
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// Print the ARNs a member account uses for a delegated domain
    ClientArns {
        /// Account owning the hosted zones
        #[arg(long)]
        account_id: String,
        #[arg(long)]
        region: String,
        #[arg(long)]
        domain: String,
        /// The domain was requested together with others in one role
        #[arg(long)]
        multi_zone: bool,
    },
}

#[derive(clap::Args, Debug)]
struct PlanInput {
    /// Provisioning configuration (JSON)
    #[arg(long, env = "ROUTE_MASTER_CONFIG")]
    config: PathBuf,
    /// `aws route53 list-hosted-zones-by-name` output used to resolve zone ids
    #[arg(long, env = "ROUTE_MASTER_HOSTED_ZONES")]
    hosted_zones: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DomainReport {
    domain: String,
    #[serde(flatten)]
    class: DomainClass,
    namespace: String,
    normalized: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    string_equals: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    string_like: Option<Vec<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ClientArns {
    zone_account: String,
    hosted_zone_id_parameter_arn: String,
    cross_account_role_arn: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

async fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Plan { input } => {
            let (_, plan) = build_plan(&input)?;
            print_json(&plan)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Apply {
            input,
            yes,
            keep_existing,
        } => {
            let (config, plan) = build_plan(&input)?;
            apply(&config, &plan, yes, keep_existing).await
        }
        Commands::Classify { domains } => classify_domains(&domains),
        Commands::ClientArns {
            account_id,
            region,
            domain,
            multi_zone,
        } => {
            let client = HostedZoneClient::new(AccountContext { account_id, region }, domain);
            print_json(&ClientArns {
                zone_account: client.zone_account().to_string(),
                hosted_zone_id_parameter_arn: client.hosted_zone_id_parameter_arn()?,
                cross_account_role_arn: client.cross_account_role_arn(multi_zone),
            })?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_plan(input: &PlanInput) -> Result<(ProvisioningConfig, ProvisioningPlan)> {
    let config = ProvisioningConfig::from_path(&input.config)
        .with_context(|| format!("Failed to load {}", input.config.display()))?;
    let listing = input
        .hosted_zones
        .as_deref()
        .map(load_listing)
        .transpose()?;
    let plan = plan(&config, listing.as_ref()).context("Failed to plan delegation")?;
    Ok((config, plan))
}

fn load_listing(path: &Path) -> Result<HostedZoneListing> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    HostedZoneListing::from_json(&json)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

async fn apply(
    config: &ProvisioningConfig,
    plan: &ProvisioningPlan,
    yes: bool,
    keep_existing: bool,
) -> Result<ExitCode> {
    let role_names: Vec<&str> = plan.roles().map(|r| r.role_name.as_str()).collect();
    if role_names.is_empty() {
        eprintln!("Plan contains no roles to apply.");
        return Ok(ExitCode::from(EXIT_REFUSED));
    }

    eprintln!(
        "Roles to provision in account {}:",
        config.account.account_id
    );
    for name in &role_names {
        eprintln!("  {name}");
    }

    if !yes {
        if !(atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stderr)) {
            eprintln!("Refusing to apply without --yes; run interactively in a TTY or pass --yes.");
            return Ok(ExitCode::from(EXIT_REFUSED));
        }
        if !confirm(role_names.len())? {
            eprintln!("Aborted.");
            return Ok(ExitCode::from(EXIT_REFUSED));
        }
    }

    let service = RouteMasterService::new()
        .await
        .context("Failed to initialize service")?;
    let options = ApplyOptions {
        replace_existing: !keep_existing,
    };
    let result = service
        .apply(plan, &config.account.account_id, options)
        .await
        .context("Failed to apply plan")?;

    print_json(&result)?;
    Ok(ExitCode::SUCCESS)
}

fn confirm(role_count: usize) -> Result<bool> {
    eprint!("Apply {role_count} role(s)? [y/N] ");
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn classify_domains(domains: &[String]) -> Result<ExitCode> {
    let mut reports = Vec::with_capacity(domains.len());
    let mut invalid = 0;

    for domain in domains {
        let class = classify(domain);
        let (string_equals, string_like) = match build_match_sets(&[domain]) {
            Ok(sets) => (Some(sets.string_equals), Some(sets.string_like)),
            Err(e) => {
                debug!("{e}");
                invalid += 1;
                (None, None)
            }
        };
        reports.push(DomainReport {
            domain: domain.clone(),
            class,
            namespace: extract_namespace_domain(domain),
            normalized: normalize_domain(domain),
            string_equals,
            string_like,
        });
    }

    print_json(&reports)?;
    if invalid > 0 {
        eprintln!("{invalid} of {} domain(s) are invalid.", domains.len());
        return Ok(ExitCode::from(EXIT_ERROR));
    }
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
