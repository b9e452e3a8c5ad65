use anyhow::{anyhow, Result};
use aws_config::{BehaviorVersion, Region};
use chrono::Utc;
use tracing::info;

use iam_key_auditor::{
    execute, load_config, IamDirectory, Notifier, NotifierKind, SesNotifier, SlackNotifier,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cfg = load_config()?;
    info!(
        "thresholds: max key age {}d, max unused {}d; notifier {:?}",
        cfg.thresholds.max_key_age_days, cfg.thresholds.max_unused_days, cfg.notifier
    );

    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &cfg.aws_region {
        loader = loader.region(Region::new(region.clone()));
    }
    let sdk_config = loader.load().await;

    let directory = IamDirectory::new(&sdk_config);
    let notifier: Box<dyn Notifier> = match cfg.notifier {
        NotifierKind::Ses => Box::new(SesNotifier::new(&sdk_config)),
        NotifierKind::Slack => {
            let url = cfg
                .slack_webhook_url
                .clone()
                .ok_or_else(|| anyhow!("SLACK_WEBHOOK_URL must be set for the Slack notifier"))?;
            Box::new(SlackNotifier::new(url))
        }
    };

    let result = execute(&directory, notifier.as_ref(), &cfg, Utc::now()).await;
    println!("{}", serde_json::to_string(&result)?);

    if !result.is_success() {
        return Err(anyhow!(result.body));
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
