//! SWAN demo command line

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use serde_json::json;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swan_demo::{
    audit::{self, OfferView},
    config::{Args, Command, Mode},
    domain::{Configuration, SigningIdentityStore, SiteRegistry, StaticIdentityStore},
    gateway::HttpTransport,
    owid::OfferTree,
    request::PageRequest,
    swan::{FirstBidWinner, WinnerByOwid, WinnerSelector},
    types::{DemoError, Result},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("swan_demo={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let identities: Arc<dyn SigningIdentityStore> = match &args.owid_store {
        Some(path) => {
            let store = StaticIdentityStore::from_file(path)?;
            info!("OWID store: {} ({} signer(s))", path.display(), store.len());
            Arc::new(store)
        }
        None => {
            warn!("No OWID_STORE set, no site has a signing identity");
            Arc::new(StaticIdentityStore::default())
        }
    };
    let transport = Arc::new(HttpTransport::new(args.request_timeout()));
    let config = Configuration::new(args.scheme.clone(), transport, identities);

    match args.command {
        Command::Check => check(&config, &args.sites_dir).await?,
        Command::Audit { tree, mode, winner } => audit_tree(&tree, mode, winner)?,
        Command::Url {
            host,
            action,
            path,
            return_url,
        } => {
            let registry = SiteRegistry::load_dir(&config, &args.sites_dir)?;
            let domain = registry
                .get(&host)
                .ok_or_else(|| DemoError::SiteNotFound(host.clone()))?;
            let request = PageRequest::from_target(host.as_str(), &path);
            let url = domain
                .create_swan_url(&request, return_url.as_deref(), &action, |_| {})
                .await?;
            println!("{}", url);
        }
        Command::Page {
            host,
            target,
            offer,
        } => {
            let registry = SiteRegistry::load_dir(&config, &args.sites_dir)?;
            let domain = registry
                .get(&host)
                .ok_or_else(|| DemoError::SiteNotFound(host.clone()))?;
            let request = PageRequest::from_target(host.as_str(), &target);
            let tree = offer.as_deref().map(read_tree).transpose()?;
            let view = OfferView::new(&request, tree.as_ref(), &FirstBidWinner);
            let links = view.offer_links(&args.scheme);

            let context = json!({
                "name": domain.name(),
                "host": domain.host(),
                "category": domain.category(),
                "path": request.path,
                "offer": {
                    "id": view.offer_id(),
                    "stop": view.stop(),
                    "fields": view.offer_fields_html(),
                    "json": view.tree_as_json()?,
                    "auditWinner": view.audit_winner_html()?,
                    "auditFull": view.audit_full_html()?,
                    "verifyUrl": links.as_ref().map(|l| l.verify_url()),
                    "creatorUrl": links.as_ref().map(|l| l.creator_url()),
                    "decodeAndVerifyUrl": links.as_ref().map(|l| l.decode_and_verify_url()),
                },
            });
            println!("{}", domain.render_html(&request.path, &context)?);
        }
    }

    Ok(())
}

async fn check(config: &Configuration, sites_dir: &Path) -> Result<()> {
    let registry = SiteRegistry::load_dir(config, sites_dir)?;

    for domain in registry.iter() {
        let signer = match domain.signing_identity().await {
            Ok(identity) => identity.name.clone(),
            Err(e) => {
                warn!(host = %domain.host(), "{}", e);
                "-".to_string()
            }
        };
        println!(
            "{:<28} {:<12} templates={:<3} access_node={:<24} signer={}",
            domain.host(),
            domain.category(),
            domain.templates().len(),
            if domain.access_node().is_empty() { "-" } else { domain.access_node() },
            signer
        );
    }
    for failure in registry.failures() {
        println!("{:<28} FAILED {}", failure.folder.display(), failure.error);
    }

    if registry.is_empty() {
        return Err(DemoError::Config(format!(
            "no sites found in {}",
            sites_dir.display()
        )));
    }
    Ok(())
}

fn read_tree(path: &Path) -> Result<OfferTree> {
    let json = std::fs::read_to_string(path)?;
    Ok(OfferTree::from_json(&json)?)
}

fn audit_tree(path: &Path, mode: Mode, winner: Option<String>) -> Result<()> {
    let tree = read_tree(path)?;
    let selector: Box<dyn WinnerSelector> = match winner {
        Some(owid) => Box::new(WinnerByOwid(owid)),
        None => Box::new(FirstBidWinner),
    };
    let winner = selector
        .select(&tree)?
        .ok_or(audit::AuditError::NoWinner)?;

    let rows = audit::render(&tree, winner, mode.into())?;
    print!("{}", audit::rows_to_html(&rows));
    Ok(())
}
