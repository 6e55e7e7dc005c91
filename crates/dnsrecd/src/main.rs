// # dnsrecd - DNS record reconciliation runner
//
// This is a THIN integration layer only. All reconciliation logic lives in
// dnsrec-core; this binary:
// 1. Reads runner settings from environment variables
// 2. Loads one record spec (JSON) from a file or stdin
// 3. Builds the provider through the registry
// 4. Runs a single reconciliation pass and prints the result as JSON
//
// ## Configuration
//
// - `DNSREC_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `DNSREC_MODE`: `dry-run` forces dry-run regardless of the spec
// - `DNSREC_PROVIDER`: `ns1` (default) or `memory`
//
// ## Example
//
// ```bash
// cat > www.json <<'JSON'
// {
//   "apiKey": "your_key",
//   "name": "www",
//   "zone": "example.com",
//   "type": "A",
//   "answers": [{"answer": ["192.168.1.0"]}]
// }
// JSON
//
// DNSREC_MODE=dry-run dnsrecd www.json
// ```
//
// Output goes to stdout (`{"changed": .., "id": .., "data": ..}` or
// `{"failed": true, "msg": ..}`); logs go to stderr.

use anyhow::Result;
use dnsrec_core::config::ProviderConfig;
use dnsrec_core::{ProviderRegistry, ReconcileOptions, RecordSpec, Reconciler, Report};
use serde_json::json;
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunExitCode {
    /// Pass completed (changed or not)
    Success = 0,
    /// Invalid runner settings or record spec; no provider call was made
    ConfigError = 1,
    /// Provider or runtime failure
    RuntimeError = 2,
}

impl From<RunExitCode> for ExitCode {
    fn from(code: RunExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Runner configuration
#[derive(Debug)]
struct Config {
    log_level: String,
    dry_run: bool,
    provider_type: String,
    /// `None` or `-` reads the spec from stdin
    spec_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables and arguments
    fn from_env() -> Result<Self> {
        Ok(Self {
            log_level: env::var("DNSREC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            dry_run: env::var("DNSREC_MODE")
                .unwrap_or_default()
                .eq_ignore_ascii_case("dry-run"),
            provider_type: env::var("DNSREC_PROVIDER").unwrap_or_else(|_| "ns1".to_string()),
            spec_path: env::args().nth(1),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DNSREC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        match self.provider_type.as_str() {
            "ns1" | "memory" => {}
            _ => anyhow::bail!(
                "DNSREC_PROVIDER '{}' is not supported. \
                Supported providers: ns1, memory",
                self.provider_type
            ),
        }

        Ok(())
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn load_spec(&self) -> dnsrec_core::Result<RecordSpec> {
        match self.spec_path.as_deref() {
            None | Some("-") => RecordSpec::from_reader(std::io::stdin().lock()),
            Some(path) => RecordSpec::from_path(path),
        }
    }

    /// Provider configuration for this run
    fn provider_config(&self, spec: &RecordSpec) -> ProviderConfig {
        match self.provider_type.as_str() {
            "memory" => ProviderConfig::Memory {
                zones: vec![spec.zone.clone()],
            },
            _ => spec.provider_config(),
        }
    }

    fn options(&self) -> ReconcileOptions {
        if self.dry_run {
            ReconcileOptions::dry_run()
        } else {
            ReconcileOptions::default()
        }
    }
}

/// One pass for a loaded spec
///
/// Building the provider makes no API call; the spec is validated by the
/// reconciler before the first one.
async fn run(
    config: &Config,
    registry: &ProviderRegistry,
    spec: RecordSpec,
) -> dnsrec_core::Result<Report> {
    let provider = registry.create_provider(&config.provider_config(&spec))?;
    let reconciler = Reconciler::new(provider, config.options());

    info!(
        "Reconciling {} ({}) in {} [mode: {:?}]",
        spec.name,
        spec.record_type,
        spec.zone,
        reconciler.mode()
    );

    reconciler.reconcile_spec(spec).await
}

/// Print the JSON result line
fn emit_report(report: &Report) {
    match serde_json::to_string(report) {
        Ok(line) => println!("{}", line),
        Err(e) => emit_failure(&format!("Failed to serialize result: {}", e)),
    }
}

fn failure_json(msg: &str) -> serde_json::Value {
    json!({ "failed": true, "msg": msg })
}

fn emit_failure(msg: &str) {
    println!("{}", failure_json(msg));
}

/// Exit code for a failed pass
fn exit_code_for(err: &dnsrec_core::Error) -> RunExitCode {
    if err.is_config() {
        RunExitCode::ConfigError
    } else {
        RunExitCode::RuntimeError
    }
}

fn registry() -> ProviderRegistry {
    let registry = ProviderRegistry::with_builtin();

    #[cfg(feature = "ns1")]
    dnsrec_provider_ns1::register(&registry);

    registry
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            emit_failure(&format!("Configuration error: {}", e));
            return RunExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        emit_failure(&format!("Configuration validation error: {}", e));
        return RunExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        emit_failure(&format!("Failed to set tracing subscriber: {}", e));
        return RunExitCode::ConfigError.into();
    }

    // Everything up to here touches no provider
    let spec = match config.load_spec() {
        Ok(spec) => spec,
        Err(e) => {
            error!("Failed to load record spec: {}", e);
            emit_failure(&e.to_string());
            return RunExitCode::ConfigError.into();
        }
    };
    debug!("Loaded record spec: {:?}", spec);

    // One pass, sequential calls: a single-threaded runtime is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            emit_failure(&format!("Failed to create runtime: {}", e));
            return RunExitCode::RuntimeError.into();
        }
    };

    match rt.block_on(run(&config, &registry(), spec)) {
        Ok(report) => {
            info!("Reconciliation finished: changed={}", report.changed);
            emit_report(&report);
            RunExitCode::Success.into()
        }
        Err(e) => {
            error!("Reconciliation failed: {}", e);
            emit_failure(&e.to_string());
            exit_code_for(&e).into()
        }
    }
}
