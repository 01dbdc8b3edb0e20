use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cashload_core::domain::filter::{parse_agency_filter, parse_period_filter, parse_status_filter};
use cashload_core::notify::{LogNotifier, ReplenishmentNotifier};
use cashload_core::session::DashboardSession;

mod report;

#[derive(Debug, Parser)]
#[command(name = "cashload_worker")]
struct Args {
    /// JSON array of terminals. Overrides CASHLOAD_TERMINALS_PATH; defaults to the demo fleet.
    #[arg(long)]
    terminals: Option<String>,

    /// Agency code, or "all".
    #[arg(long, default_value = "all")]
    agency: String,

    /// operational | alert | critical | all.
    #[arg(long, default_value = "all")]
    status: String,

    /// t-0 | t-1 | t-2 | t-3 | t-7 | all.
    #[arg(long, default_value = "all")]
    period: String,

    /// Print the evaluated view as JSON instead of the log report.
    #[arg(long)]
    json: bool,

    /// Send the replenishment notice for terminals with a scheduled reload.
    #[arg(long)]
    notify: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = cashload_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    if let Err(err) = run(&mut settings, args).await {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %err, "evaluation run failed");
        return Err(err);
    }
    Ok(())
}

async fn run(settings: &mut cashload_core::config::Settings, args: Args) -> anyhow::Result<()> {
    if args.terminals.is_some() {
        settings.terminals_path = args.terminals.clone();
    }
    let registry = settings.load_registry()?;

    let mut session = DashboardSession::new(registry);
    session.set_agency_filter(parse_agency_filter(&args.agency));
    session.set_status_filter(parse_status_filter(&args.status).context("invalid --status")?);
    session.set_period_filter(parse_period_filter(&args.period).context("invalid --period")?);

    let view = session.view();

    if args.json {
        let out = serde_json::to_string_pretty(&view).context("failed to serialize view")?;
        println!("{out}");
    } else {
        report::log_view(&view, &settings.currency_symbol);
    }

    if args.notify {
        let batch = session.pending_notices();
        if batch.is_empty() {
            tracing::info!("no scheduled reloads; nothing to notify");
            return Ok(());
        }
        let report = LogNotifier.send(&batch).await?;
        tracing::info!(
            notice_id = %report.notice_id,
            notified = report.notified,
            total = %cashload_core::format::format_amount(report.total_amount, &settings.currency_symbol),
            "replenishment notices sent"
        );
    }

    Ok(())
}

fn init_sentry(settings: &cashload_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
