//! One module per subcommand, plus the flag-to-options translation shared by
//! `new` and `add`.

pub mod add;
pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod list;
pub mod new;

use kiln_core::{
    domain::{
        Dialect, FeatureKind, MessagingBackend, MonitoringTool, OptionRecord, PersistenceBackend,
        RateLimitStore,
    },
    error::KilnError,
};

use crate::{cli::FeatureArgs, config::AppConfig, error::CliResult};

/// Build the option record from feature flags, falling back to the
/// configured defaults where a flag was not given.
pub fn build_options(
    flags: &FeatureArgs,
    dialect: Dialect,
    config: &AppConfig,
) -> CliResult<OptionRecord> {
    let persistence = flags
        .db
        .map(PersistenceBackend::from)
        .unwrap_or(config.defaults.persistence);

    // A store choice alone switches rate limiting on.
    let rate_limit = (flags.rate_limit || flags.rate_limit_store.is_some())
        .then(|| flags.rate_limit_store.map_or(RateLimitStore::Memory, Into::into));

    let options = OptionRecord::builder()
        .dialect(dialect)
        .persistence(persistence)
        .data_access(flags.orm.into())
        .auth(flags.auth)
        .authorization(flags.casl)
        .roles(flags.roles)
        .example(flags.example)
        .testing(flags.tests || config.defaults.tests)
        .env_file(flags.env || config.defaults.env_file)
        .api_docs(flags.docs)
        .realtime(flags.realtime)
        .microservices(flags.microservices)
        .demo(flags.demo.map(Into::into).unwrap_or_default())
        .messaging(flags.messaging.iter().copied().map(MessagingBackend::from))
        .monitoring(flags.monitoring.iter().copied().map(MonitoringTool::from))
        .rate_limit(rate_limit)
        .build()
        .map_err(KilnError::from)?;

    Ok(options)
}

/// Turn on the toggle that `kiln add <feature>` names.
///
/// Features that need a value (a backend, a tool list, a demo kind) are
/// left to their flags.
pub fn enable_named(flags: &mut FeatureArgs, feature: FeatureKind) {
    match feature {
        FeatureKind::Auth => flags.auth = true,
        FeatureKind::Authorization => flags.casl = true,
        FeatureKind::Roles => flags.roles = true,
        FeatureKind::Example => flags.example = true,
        FeatureKind::Testing => flags.tests = true,
        FeatureKind::Env => flags.env = true,
        FeatureKind::RateLimit => flags.rate_limit = true,
        FeatureKind::ApiDocs => flags.docs = true,
        FeatureKind::Realtime => flags.realtime = true,
        FeatureKind::Microservices => flags.microservices = true,
        FeatureKind::Persistence
        | FeatureKind::Demo
        | FeatureKind::Messaging
        | FeatureKind::Monitoring => {}
    }
}
