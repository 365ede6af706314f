use clap::Parser;
use hydration_bench_chrome::HeadlessChromeLauncher;
use hydration_bench_lighthouse::LighthouseCli;
use hydration_bench_runner::prelude::*;
use std::path::PathBuf;
use url::Url;

/// Compare the page load performance of the Baseline and MRAH builds of the demo store.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct HydrationComparisonCli {
    #[command(flatten)]
    bench: HydrationBenchCli,

    /// The product whose page is audited.
    #[clap(long, default_value = "123")]
    product_id: String,

    /// Where the Baseline app is running.
    #[clap(long, default_value = "http://localhost:3000")]
    baseline_url: Url,

    /// Where the MRAH app is running.
    #[clap(long, default_value = "http://localhost:3001")]
    mrah_url: Url,

    /// Path to the `lighthouse` CLI. Looked up on `PATH` if not set.
    #[clap(long)]
    lighthouse_path: Option<PathBuf>,

    /// Path to the Chrome or Chromium executable. Detected if not set.
    #[clap(long)]
    chrome_path: Option<PathBuf>,
}

fn product_url(app_url: &Url, product_id: &str) -> anyhow::Result<Url> {
    Ok(app_url.join(&format!("/products/{product_id}"))?)
}

fn definition(cli: &HydrationComparisonCli) -> HydrationBenchResult<EvaluationDefinition> {
    let baseline = product_url(&cli.baseline_url, &cli.product_id)?;
    let mrah = product_url(&cli.mrah_url, &cli.product_id)?;

    EvaluationDefinitionBuilder::new(env!("CARGO_PKG_NAME"), cli.bench.clone())
        .with_default_run_count(5)
        .add_warmup_target("Baseline app", cli.baseline_url.join("/")?)
        .add_warmup_target("MRAH app", cli.mrah_url.join("/")?)
        .add_scenario(Scenario::new(
            "Baseline - Desktop Fast Network",
            baseline.clone(),
            AuditConfig::desktop_fast(),
        ))
        .add_scenario(Scenario::new(
            "Baseline - Mobile Slow 3G",
            baseline,
            AuditConfig::mobile_slow(),
        ))
        .add_scenario(Scenario::new(
            "MRAH - Desktop Fast Network",
            mrah.clone(),
            AuditConfig::desktop_fast(),
        ))
        .add_scenario(Scenario::new(
            "MRAH - Mobile Slow 3G",
            mrah,
            AuditConfig::mobile_slow(),
        ))
        .record_env("PRODUCT_ID", &cli.product_id)
        .record_env("BASELINE_URL", &cli.baseline_url)
        .record_env("MRAH_URL", &cli.mrah_url)
        .build()
}

fn main() -> HydrationBenchResult<()> {
    let cli = init::<HydrationComparisonCli>();
    let fail_on_empty = cli.bench.fail_on_empty;

    let definition = definition(&cli)?;
    let launcher = HeadlessChromeLauncher::new().with_chrome_path(cli.chrome_path.clone());
    let mut engine = LighthouseCli::locate(cli.lighthouse_path.as_deref())?
        .with_headless(definition.browser.headless);

    let outcome = run(definition, &launcher, &mut engine)?;
    if let Some(path) = &outcome.summary_path {
        println!("Summary results saved to: {}", path.display());
    }

    outcome.check(fail_on_empty)
}
